/// Byte geometry of one fixed-length sample record: a big-endian tag-code
/// label followed by raw uint8 pixels stored [depth, height, width].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub label_bytes: usize,
    pub image_width: usize,
    pub image_height: usize,
    pub image_depth: usize,
}

// OLHWDB pot-derived binary: 2 + 64*64*1 = 4098 bytes per record
impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            label_bytes: 2,
            image_width: 64,
            image_height: 64,
            image_depth: 1,
        }
    }
}

impl RecordLayout {
    pub fn image_bytes(&self) -> usize {
        self.image_width * self.image_height * self.image_depth
    }

    pub fn record_bytes(&self) -> usize {
        self.label_bytes + self.image_bytes()
    }

    /// Shape of a decoded image, [height, width, depth].
    pub fn image_shape(&self) -> [usize; 3] {
        [self.image_height, self.image_width, self.image_depth]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_pot_records() {
        let layout = RecordLayout::default();
        assert_eq!(layout.image_bytes(), 4096);
        assert_eq!(layout.record_bytes(), 4098);
        assert_eq!(layout.image_shape(), [64, 64, 1]);
    }

    #[test]
    fn derived_sizes() {
        let layout = RecordLayout {
            label_bytes: 1,
            image_width: 3,
            image_height: 2,
            image_depth: 4,
        };
        assert_eq!(layout.image_bytes(), 24);
        assert_eq!(layout.record_bytes(), 25);
        assert_eq!(layout.image_shape(), [2, 3, 4]);
    }
}
