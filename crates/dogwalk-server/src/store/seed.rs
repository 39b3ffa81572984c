//! Sample dogs loaded at startup for local development.

use dogwalk_core::{Dog, PhotoStatus, Sex, Size, Socialization};

const PHOTO_ROOT: &str = "https://images.dog.ceo/breeds";

/// `(id, name, breed, photo path under the breeds root)`
const ROSTER: &[(&str, &str, &str, &str)] = &[
    ("3", "Max", "Beagle", "beagle/n02088364_12124.jpg"),
    ("4", "Luna", "Labrador Retriever", "retriever-labrador/n02099712_1622.jpg"),
    ("5", "Bella", "Poodle", "poodle-standard/n02113799_2280.jpg"),
    ("6", "Charlie", "Bulldog", "bulldog-english/jager-1.jpg"),
    ("8", "Cooper", "Boxer", "boxer/n02108089_5128.jpg"),
    ("9", "Daisy", "Dachshund", "dachshund/dachshund-6.jpg"),
    ("10", "Rocky", "Rottweiler", "rottweiler/n02106550_9500.jpg"),
    ("11", "Sadie", "Shih Tzu", "shihtzu/n02086240_5044.jpg"),
    ("12", "Duke", "Doberman", "doberman/n02107142_11303.jpg"),
    ("13", "Molly", "Chihuahua", "chihuahua/n02085620_8578.jpg"),
    ("14", "Tucker", "Australian Shepherd", "australian-shepherd/leroy.jpg"),
    ("15", "Zoe", "Great Dane", "dane-great/n02109047_28577.jpg"),
];

fn with_photo(mut dog: Dog, path: &str) -> Dog {
    dog.photo_url = Some(format!("{PHOTO_ROOT}/{path}"));
    dog.photo_hash = Some(format!("hash{}", dog.id));
    dog.photo_status = Some(PhotoStatus::Approved);
    dog
}

/// The fifteen sample dogs, ids `"1"` through `"15"` in order.
pub fn sample_dogs() -> Vec<Dog> {
    let rex = Dog {
        breed: Some("German Shepherd".into()),
        date_of_birth: Some("2020-01-15".into()),
        energy_level: Some(4),
        is_neutered: Some(true),
        sex: Some(Sex::Male),
        size: Some(Size::Large),
        socialization: Some(Socialization {
            good_with_children: true,
            good_with_large_dogs: true,
            good_with_puppies: true,
            good_with_small_dogs: false,
        }),
        special_instructions: Some("Needs to be walked separately from small dogs".into()),
        ..Dog::named("1", "Rex")
    };

    let buddy = Dog {
        breed: Some("Golden Retriever".into()),
        date_of_birth: Some("2019-06-20".into()),
        energy_level: Some(5),
        is_neutered: Some(true),
        sex: Some(Sex::Male),
        size: Some(Size::Large),
        socialization: Some(Socialization {
            good_with_children: true,
            good_with_large_dogs: true,
            good_with_puppies: true,
            good_with_small_dogs: true,
        }),
        special_instructions: Some("Loves to play fetch".into()),
        ..Dog::named("2", "Buddy")
    };

    let lucy = Dog {
        breed: Some("Siberian Husky".into()),
        date_of_birth: Some("2017-01-15".into()),
        energy_level: Some(5),
        is_neutered: Some(true),
        sex: Some(Sex::Female),
        size: Some(Size::Large),
        ..Dog::named("7", "Lucy")
    };

    let mut dogs = vec![
        rex,
        with_photo(buddy, "retriever-golden/n02099601_3697.jpg"),
        with_photo(lucy, "husky/n02110185_10047.jpg"),
    ];
    dogs.extend(ROSTER.iter().map(|&(id, name, breed, path)| {
        let dog = Dog {
            breed: Some(breed.into()),
            ..Dog::named(id, name)
        };
        with_photo(dog, path)
    }));
    dogs.sort_by_key(|d| d.id.parse::<u32>().unwrap_or(u32::MAX));
    dogs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifteen_dogs_in_id_order() {
        let dogs = sample_dogs();
        assert_eq!(dogs.len(), 15);
        let ids: Vec<String> = dogs.iter().map(|d| d.id.clone()).collect();
        let expected: Vec<String> = (1..=15).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
        assert_eq!(dogs[0].name, "Rex");
        assert!(dogs[0].photo_url.is_none());
        assert_eq!(dogs[14].name, "Zoe");
    }
}
