mod dataset;

pub use dataset::{
    count_images, count_images_recursive, is_image_file, list_class_dirs, list_images,
    DatasetSplit,
};
