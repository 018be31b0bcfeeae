use serde::{Deserialize, Serialize};

use crate::models::{GalleryCategory, Image};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryState {
    pub images: Vec<Image>,
    pub latest_mtime: Option<i64>,
    pub earliest_mtime: Option<i64>,
    pub are_more_images_available: bool,
}

impl CategoryState {
    pub fn with_images(images: Vec<Image>) -> Self {
        let latest_mtime = images.iter().map(|image| image.mtime).max();
        let earliest_mtime = images.iter().map(|image| image.mtime).min();
        Self {
            images,
            latest_mtime,
            earliest_mtime,
            are_more_images_available: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Categories {
    pub result: CategoryState,
    pub user: CategoryState,
}

impl Categories {
    pub fn get(&self, category: GalleryCategory) -> &CategoryState {
        match category {
            GalleryCategory::Result => &self.result,
            GalleryCategory::User => &self.user,
        }
    }

    pub fn get_mut(&mut self, category: GalleryCategory) -> &mut CategoryState {
        match category {
            GalleryCategory::Result => &mut self.result,
            GalleryCategory::User => &mut self.user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryState {
    pub current_image: Option<Image>,
    pub current_image_uuid: String,
    pub current_category: GalleryCategory,
    pub categories: Categories,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self {
            current_image: None,
            current_image_uuid: String::new(),
            current_category: GalleryCategory::Result,
            categories: Categories::default(),
        }
    }
}

impl GalleryState {
    pub fn contains(&self, category: GalleryCategory, uuid: &str) -> bool {
        self.categories
            .get(category)
            .images
            .iter()
            .any(|image| image.uuid == uuid)
    }

    pub fn select(&mut self, image: &Image) {
        self.current_image = Some(image.clone());
        self.current_image_uuid = image.uuid.clone();
        self.current_category = image.category;
    }

    /// Drops the image from its category. When it was the current image the
    /// selection moves to whatever now sits at the same index.
    pub fn remove_image(&mut self, uuid: &str, category: GalleryCategory) {
        let images = &mut self.categories.get_mut(category).images;
        let Some(removed_index) = images.iter().position(|image| image.uuid == uuid) else {
            return;
        };
        images.remove(removed_index);

        if uuid != self.current_image_uuid {
            return;
        }
        match images.len() {
            0 => {
                self.current_image = None;
                self.current_image_uuid = String::new();
            }
            len => {
                let next = images[removed_index.min(len - 1)].clone();
                self.current_image_uuid = next.uuid.clone();
                self.current_image = Some(next);
            }
        }
    }
}
