//! Plain-text rendering of dogs for the CLI.

use std::fmt::Write;

use dogwalk_core::{DetectedBreed, Dog, Socialization};

/// One-line summary used by `dogwalk list`.
pub fn dog_line(dog: &Dog) -> String {
    let mut line = format!("{:>4}  {}", dog.id, dog.name);
    if let Some(breed) = &dog.breed {
        let _ = write!(line, " ({breed})");
    }
    if let Some(status) = dog.photo_status {
        let _ = write!(line, " [photo {status}]");
    }
    line
}

/// Full profile used by `dogwalk show`.
pub fn dog_detail(dog: &Dog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", dog.name, dog.id);

    let mut field = |label: &str, value: Option<String>| {
        if let Some(v) = value {
            let _ = writeln!(out, "  {label:<21}{v}");
        }
    };
    field("Breed:", dog.breed.clone());
    field("Date of birth:", dog.date_of_birth.clone());
    field("Energy level:", dog.energy_level.map(|l| format!("{l}/5")));
    field("Sex:", dog.sex.map(|s| s.to_string()));
    field("Size:", dog.size.map(|s| s.to_string()));
    field(
        "Neutered:",
        dog.is_neutered.map(|n| if n { "yes" } else { "no" }.to_string()),
    );
    field("Good with:", dog.socialization.as_ref().map(good_with));
    field("Special instructions:", dog.special_instructions.clone());
    field(
        "Photo:",
        dog.photo_url.as_ref().map(|url| match dog.photo_status {
            Some(status) => format!("{url} ({status})"),
            None => url.clone(),
        }),
    );
    out
}

pub fn detected_breed(detected: &DetectedBreed) -> String {
    format!(
        "Detected breed: {} ({}% confidence)",
        detected.breed, detected.confidence
    )
}

fn good_with(s: &Socialization) -> String {
    let labels: Vec<&str> = [
        (s.good_with_children, "children"),
        (s.good_with_large_dogs, "large dogs"),
        (s.good_with_small_dogs, "small dogs"),
        (s.good_with_puppies, "puppies"),
    ]
    .into_iter()
    .filter_map(|(ok, label)| ok.then_some(label))
    .collect();

    if labels.is_empty() {
        "-".to_string()
    } else {
        labels.join(", ")
    }
}
