use once_cell::sync::Lazy;

use crate::domain::Ngo;

/// Sample organisations inserted when a directory is empty.
pub static SAMPLE_NGOS: Lazy<Vec<Ngo>> = Lazy::new(|| {
    vec![
        Ngo::new("Save the Children", "Helping children in need")
            .with_category("children")
            .with_wallet("0x123456789abcdef")
            .verified(),
        Ngo::new("Animal Rescue", "Protecting endangered animals")
            .with_category("animals")
            .with_wallet("0xabcdef123456789")
            .verified(),
        Ngo::new("Brave Soldiers Fund", "Supporting veterans and their families")
            .with_category("army")
            .with_wallet("0x987654321abcdef")
            .verified(),
        Ngo::new("Science Research Institute", "Advancing scientific research")
            .with_category("research")
            .with_wallet("0xfedcba987654321")
            .verified(),
    ]
});

/// Fresh copies of the sample list, each with its own id and timestamp.
pub fn sample_ngos() -> Vec<Ngo> {
    SAMPLE_NGOS
        .iter()
        .map(|template| {
            let mut ngo = Ngo::new(template.name.clone(), template.description.clone());
            ngo.categories = template.categories.clone();
            ngo.wallet_address = template.wallet_address.clone();
            ngo.verification = template.verification;
            ngo
        })
        .collect()
}
