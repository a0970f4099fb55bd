/// One batch of decoded, standardized samples.
///
/// `images` is [samples, height, width, depth] row-major f32, `labels` is
/// [samples, num_classes] one-hot.
pub struct SampleBatch {
    pub images: Box<[f32]>,
    pub labels: Box<[i32]>,
    pub samples: usize,
    pub image_shape: [usize; 3],
    pub num_classes: usize,
    pub batch_number: usize,
}

impl SampleBatch {
    pub fn pixels_per_image(&self) -> usize {
        self.image_shape.iter().product()
    }

    pub fn image(&self, i: usize) -> &[f32] {
        let pixels = self.pixels_per_image();
        &self.images[i * pixels..(i + 1) * pixels]
    }

    pub fn label(&self, i: usize) -> &[i32] {
        &self.labels[i * self.num_classes..(i + 1) * self.num_classes]
    }

    /// Class index of sample `i`, or None for an all-zero label.
    pub fn class_of(&self, i: usize) -> Option<usize> {
        self.label(i).iter().position(|&v| v == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_sample_views() {
        let batch = SampleBatch {
            images: vec![0.0; 2 * 6].into_boxed_slice(),
            labels: vec![0, 1, 0, 0, 0, 0].into_boxed_slice(),
            samples: 2,
            image_shape: [2, 3, 1],
            num_classes: 3,
            batch_number: 0,
        };
        assert_eq!(batch.pixels_per_image(), 6);
        assert_eq!(batch.image(1).len(), 6);
        assert_eq!(batch.label(0), &[0, 1, 0]);
        assert_eq!(batch.class_of(0), Some(1));
        assert_eq!(batch.class_of(1), None);
    }
}
