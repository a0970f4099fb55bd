use crate::charset::Charset;
use crate::dataset::config::UnknownTagcode;
use crate::dataset::error::DatasetError;

use super::layout::RecordLayout;

/// One decoded record: image as f32 [height, width, depth] row-major,
/// label one-hot over the charset.
pub struct DecodedSample {
    pub image: Vec<f32>,
    pub label: Vec<i32>,
}

pub fn decode(
    raw: &[u8],
    layout: &RecordLayout,
    charset: &Charset,
    policy: UnknownTagcode,
) -> Result<DecodedSample, DatasetError> {
    let mut image = vec![0f32; layout.image_bytes()];
    let mut label = vec![0i32; charset.num_classes()];
    decode_into(raw, layout, charset, policy, &mut image, &mut label)?;
    Ok(DecodedSample { image, label })
}

/// Decodes one raw record into caller-provided buffers. `image_out` must
/// hold `layout.image_bytes()` elements and `label_out` one per class.
///
/// Pure function of its inputs; safe to run concurrently across records.
pub fn decode_into(
    raw: &[u8],
    layout: &RecordLayout,
    charset: &Charset,
    policy: UnknownTagcode,
    image_out: &mut [f32],
    label_out: &mut [i32],
) -> Result<(), DatasetError> {
    if raw.len() != layout.record_bytes() {
        return Err(DatasetError::ShortRecord {
            got: raw.len(),
            expected: layout.record_bytes(),
        });
    }

    // Label field: big-endian unsigned, at most 2 bytes
    let tag = raw[..layout.label_bytes]
        .iter()
        .fold(0u16, |acc, &b| (acc << 8) | b as u16);

    label_out.fill(0);
    match charset.index_of(tag) {
        Some(class) => label_out[class] = 1,
        None => {
            if policy == UnknownTagcode::Fail {
                return Err(DatasetError::UnknownTagcode { tag });
            }
        }
    }

    // Pixels are stored [depth, height, width]; emit [height, width, depth]
    let (width, height, depth) = (layout.image_width, layout.image_height, layout.image_depth);
    let pixels = &raw[layout.label_bytes..];
    for d in 0..depth {
        for h in 0..height {
            for w in 0..width {
                image_out[(h * width + w) * depth + d] = pixels[(d * height + h) * width + w] as f32;
            }
        }
    }

    Ok(())
}

/// Per-image standardization: subtract the image's own mean and divide by
/// its stddev, floored at 1/sqrt(num_pixels) so near-constant images stay
/// finite.
pub fn standardize(image: &mut [f32]) {
    let n = image.len() as f32;
    let mean = image.iter().sum::<f32>() / n;
    let variance = image.iter().map(|&x| (x - mean) * (x - mean)).sum::<f32>() / n;
    let adjusted_stddev = variance.sqrt().max(1.0 / n.sqrt());
    for x in image.iter_mut() {
        *x = (*x - mean) / adjusted_stddev;
    }
}

/// The training flag is an augmentation hook; preprocessing is currently
/// identical for train and eval.
pub fn preprocess(image: &mut [f32], _training: bool) {
    standardize(image);
}
