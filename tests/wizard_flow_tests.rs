mod common;

use common::{complete_personal, food_draft, sample_ngo};
use donation_core::{
    domain::{AnimalSubcategory, Category, Choice, DonationMode, DonationType},
    wizard::{next_step, validate_submission, DonationDraft, DonationWizard, PersonalField, Step},
};

fn wizard_with_personal_info() -> DonationWizard {
    let mut wizard = DonationWizard::new();
    let personal = complete_personal();
    for field in PersonalField::all() {
        wizard.set_field(*field, &personal.value(*field)).unwrap();
    }
    wizard
}

fn visited_steps(category: Category, donation_type: DonationType) -> Vec<Step> {
    let mut wizard = wizard_with_personal_info();
    let mut visited = vec![wizard.step()];
    while !wizard.step().is_last() {
        match wizard.step() {
            Step::Category => wizard.select_category(category),
            Step::AnimalType => wizard.select_subcategory(AnimalSubcategory::Marine).unwrap(),
            Step::DonationType => wizard.select_donation_type(donation_type),
            Step::DonationMode => wizard.select_mode(DonationMode::Offline).unwrap(),
            _ => {}
        }
        visited.push(wizard.next().unwrap());
    }
    visited
}

#[test]
fn non_animal_categories_go_straight_to_donation_type() {
    for category in Category::all().iter().copied() {
        if category == Category::Animals {
            continue;
        }
        let mut wizard = wizard_with_personal_info();
        wizard.next().unwrap();
        wizard.select_category(category);
        assert_eq!(wizard.next().unwrap(), Step::DonationType);
        assert_eq!(wizard.draft().subcategory, None);
    }
}

#[test]
fn animals_then_subcategory_reaches_donation_type() {
    for subcategory in AnimalSubcategory::all().iter().copied() {
        let mut wizard = wizard_with_personal_info();
        wizard.next().unwrap();
        wizard.select_category(Category::Animals);
        assert_eq!(wizard.next().unwrap(), Step::AnimalType);
        wizard.select_subcategory(subcategory).unwrap();
        assert_eq!(wizard.next().unwrap(), Step::DonationType);
        assert_eq!(wizard.draft().subcategory, Some(subcategory));
    }
}

#[test]
fn money_never_shows_the_mode_step() {
    for category in Category::all().iter().copied() {
        let steps = visited_steps(category, DonationType::Money);
        assert!(!steps.contains(&Step::DonationMode), "{category:?}: {steps:?}");
        assert_eq!(steps.last(), Some(&Step::Details));
    }
}

#[test]
fn money_mode_is_always_online() {
    let mut wizard = wizard_with_personal_info();
    wizard.select_donation_type(DonationType::Books);
    wizard.select_mode(DonationMode::Offline).unwrap();
    wizard.select_donation_type(DonationType::Money);
    assert_eq!(wizard.draft().donation_mode, Some(DonationMode::Online));
    assert!(wizard.select_mode(DonationMode::Offline).is_err());
    assert_eq!(wizard.draft().donation_mode, Some(DonationMode::Online));
}

#[test]
fn in_kind_paths_visit_the_mode_step() {
    assert_eq!(
        visited_steps(Category::Animals, DonationType::Clothes),
        vec![
            Step::PersonalInfo,
            Step::Category,
            Step::AnimalType,
            Step::DonationType,
            Step::DonationMode,
            Step::Details,
        ]
    );
    assert_eq!(
        visited_steps(Category::Rural, DonationType::Teaching),
        vec![
            Step::PersonalInfo,
            Step::Category,
            Step::DonationType,
            Step::DonationMode,
            Step::Details,
        ]
    );
}

#[test]
fn sequencer_is_total_over_every_step() {
    let drafts = [
        DonationDraft::default(),
        food_draft(&sample_ngo()),
        DonationDraft {
            category: Some(Category::Animals),
            donation_type: Some(DonationType::Money),
            ..DonationDraft::default()
        },
    ];
    for draft in &drafts {
        for step in Step::ALL {
            let next = next_step(step, draft);
            assert!(next >= step);
            assert!(next.index() <= 6);
        }
    }
}

#[test]
fn revisiting_category_clears_stale_subcategory() {
    let mut wizard = wizard_with_personal_info();
    wizard.next().unwrap();
    wizard.select_category(Category::Animals);
    wizard.next().unwrap();
    wizard.select_subcategory(AnimalSubcategory::Dogs).unwrap();
    wizard.next().unwrap();

    assert_eq!(wizard.back(), Step::AnimalType);
    assert_eq!(wizard.back(), Step::Category);
    wizard.select_category(Category::Forestation);
    assert_eq!(wizard.draft().subcategory, None);
    assert_eq!(wizard.next().unwrap(), Step::DonationType);
}

#[test]
fn validation_failure_keeps_the_current_step() {
    let mut wizard = wizard_with_personal_info();
    wizard.next().unwrap();
    let err = wizard.next().unwrap_err();
    assert_eq!(err.title, "Selection required");
    assert_eq!(wizard.step(), Step::Category);
}

#[test]
fn completed_wizard_validates_for_submission() {
    let ngo = sample_ngo();
    let mut wizard = wizard_with_personal_info();
    wizard.next().unwrap();
    wizard.select_category(Category::MentalHealth);
    wizard.next().unwrap();
    wizard.select_donation_type(DonationType::Other);
    wizard.next().unwrap();
    wizard.select_mode(DonationMode::Online).unwrap();
    wizard.next().unwrap();
    wizard.select_ngo(ngo.id);

    assert_eq!(wizard.validate().unwrap_err().title, "Missing details");
    wizard.set_other_details("Weekly counselling sessions");
    let validated = validate_submission(wizard.draft()).unwrap();
    assert_eq!(validated.ngo_id, ngo.id);
    assert_eq!(
        validated.other_details.as_deref(),
        Some("Weekly counselling sessions")
    );
}
