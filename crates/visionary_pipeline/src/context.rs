//! Rolling window of recent images passed to the next generation call.

use std::collections::VecDeque;
use visionary_core::{Image, MAX_REFERENCE_IMAGES};

/// The most recent successful images of a run, oldest first.
///
/// Never holds more than [`MAX_REFERENCE_IMAGES`]; pushing into a full window
/// drops the oldest image.
///
/// # Examples
///
/// ```
/// use visionary_core::Image;
/// use visionary_pipeline::ContextWindow;
///
/// let mut window = ContextWindow::new();
/// for byte in 1..=3u8 {
///     window.push(Image::new("image/png", vec![byte]));
/// }
/// let kept: Vec<u8> = window.images().iter().map(|i| i.data()[0]).collect();
/// assert_eq!(kept, [2, 3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextWindow {
    images: VecDeque<Image>,
}

impl ContextWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self {
            images: VecDeque::with_capacity(MAX_REFERENCE_IMAGES + 1),
        }
    }

    /// Append a newly generated image, evicting the oldest past capacity.
    pub fn push(&mut self, image: Image) {
        self.images.push_back(image);
        while self.images.len() > MAX_REFERENCE_IMAGES {
            self.images.pop_front();
        }
    }

    /// Copy of the current contents, oldest first.
    pub fn images(&self) -> Vec<Image> {
        self.images.iter().cloned().collect()
    }

    /// Number of images held.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Drop every image.
    pub fn clear(&mut self) {
        self.images.clear();
    }
}
