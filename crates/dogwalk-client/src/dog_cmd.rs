//! Dog subcommands, driven through the headless views.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use dogwalk_core::{Sex, Size};

use crate::client::{DogApi, PhotoUpload};
use crate::dog_fmt;
use crate::views::{DogDetailView, DogForm, DogListView, FormValues, ListOptions};

/// Editable profile fields shared by `create` and `update`.
#[derive(clap::Args, Debug, Default)]
pub struct DogFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub breed: Option<String>,
    /// Date of birth, e.g. 2020-01-15.
    #[arg(long)]
    pub dob: Option<String>,
    /// Energy level, 1 (calm) to 5 (very active).
    #[arg(long)]
    pub energy: Option<i64>,
    /// male or female
    #[arg(long)]
    pub sex: Option<Sex>,
    /// small, medium or large
    #[arg(long)]
    pub size: Option<Size>,
    #[arg(long)]
    pub neutered: Option<bool>,
    #[arg(long)]
    pub good_with_children: Option<bool>,
    #[arg(long)]
    pub good_with_large_dogs: Option<bool>,
    #[arg(long)]
    pub good_with_small_dogs: Option<bool>,
    #[arg(long)]
    pub good_with_puppies: Option<bool>,
    /// Special instructions for walkers.
    #[arg(long)]
    pub notes: Option<String>,
}

impl DogFields {
    /// Overwrite the form values this invocation supplies.
    pub fn apply(self, values: &mut FormValues) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        set(&mut values.name, self.name);
        set(&mut values.breed, self.breed);
        set(&mut values.date_of_birth, self.dob);
        set(&mut values.energy_level, self.energy);
        set(&mut values.sex, self.sex);
        set(&mut values.size, self.size);
        set(&mut values.is_neutered, self.neutered);
        set(&mut values.socialization.good_with_children, self.good_with_children);
        set(&mut values.socialization.good_with_large_dogs, self.good_with_large_dogs);
        set(&mut values.socialization.good_with_small_dogs, self.good_with_small_dogs);
        set(&mut values.socialization.good_with_puppies, self.good_with_puppies);
        set(&mut values.special_instructions, self.notes);
    }
}

/// Dog subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum DogAction {
    /// List dogs, optionally filtered by name.
    List {
        /// Case-insensitive name search.
        #[arg(short, long)]
        name: Option<String>,
        /// Keep loading pages until every match is shown.
        #[arg(short, long)]
        all: bool,
        /// Page size.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one dog's profile.
    Show { id: String },
    /// Create a dog profile.
    Create(DogFields),
    /// Update a dog profile.
    Update {
        id: String,
        #[command(flatten)]
        fields: DogFields,
    },
    /// Delete a dog profile.
    Delete { id: String },
    /// Upload a JPEG photo for a dog.
    UploadPhoto {
        id: String,
        path: PathBuf,
        /// Wait for the photo review to finish.
        #[arg(short, long)]
        wait: bool,
    },
    /// Guess the breed from the dog's photo.
    DetectBreed { id: String },
}

/// Execute a dog subcommand.
pub async fn run(action: DogAction, api: Arc<dyn DogApi>) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        DogAction::List { name, all, limit } => list(&mut out, api, name, all, limit).await?,
        DogAction::Show { id } => {
            let view = DogDetailView::new(api, id);
            let dog = view.load().await?;
            write!(out, "{}", dog_fmt::dog_detail(&dog))?;
        }
        DogAction::Create(fields) => {
            let mut form = DogForm::create();
            fields.apply(&mut form.values);
            let dog = form.submit(api.as_ref()).await?;
            writeln!(out, "Created dog {}: {}", dog.id, dog.name)?;
        }
        DogAction::Update { id, fields } => {
            let mut form = DogForm::edit(api.as_ref(), &id).await?;
            fields.apply(&mut form.values);
            let dog = form.submit(api.as_ref()).await?;
            writeln!(out, "Updated dog {}: {}", dog.id, dog.name)?;
        }
        DogAction::Delete { id } => {
            DogDetailView::new(api, id.clone()).delete().await?;
            writeln!(out, "Deleted dog {id}")?;
        }
        DogAction::UploadPhoto { id, path, wait } => {
            let photo = PhotoUpload::from_path(&path)?;
            let view = DogDetailView::new(api, id);
            let dog = view.upload_photo(photo).await?;
            writeln!(out, "Uploaded photo for {}: {}", dog.name, photo_summary(&dog))?;
            if wait && view.state().polling {
                let state = view.photo_settled().await;
                if let Some(dog) = state.dog {
                    writeln!(out, "Photo review: {}", photo_summary(&dog))?;
                }
            }
        }
        DogAction::DetectBreed { id } => {
            let detected = DogDetailView::new(api, id).detect_breed().await?;
            writeln!(out, "{}", dog_fmt::detected_breed(&detected))?;
        }
    }
    Ok(())
}

async fn list(
    out: &mut impl Write,
    api: Arc<dyn DogApi>,
    name: Option<String>,
    all: bool,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let view = DogListView::spawn(
        api,
        ListOptions {
            name,
            page_size: limit,
        },
    );
    let mut state = view.settled().await;
    while all && state.has_more() && state.error.is_none() {
        view.load_more();
        state = view.settled().await;
    }
    if let Some(err) = state.error {
        return Err(err.into());
    }

    if state.dogs.is_empty() {
        writeln!(out, "No dogs found")?;
        return Ok(());
    }
    for dog in &state.dogs {
        writeln!(out, "{}", dog_fmt::dog_line(dog))?;
    }
    if state.has_more() {
        writeln!(out, "More dogs available; use --all to list every match")?;
    }
    Ok(())
}

fn photo_summary(dog: &dogwalk_core::Dog) -> String {
    match (&dog.photo_url, dog.photo_status) {
        (Some(url), Some(status)) => format!("{url} ({status})"),
        (Some(url), None) => url.clone(),
        (None, _) => "no photo".to_string(),
    }
}
