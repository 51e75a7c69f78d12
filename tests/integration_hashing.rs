//! Integration tests for the hashing pipeline.
//!
//! These tests verify end-to-end behavior including:
//! - Near-duplicate files hashing close together
//! - Unrelated inputs landing about half the bits apart
//! - Rejection of wrongly sized input and mismatched hashes
//! - Batch hashing over real files

use assert_fs::prelude::*;
use dct_phash::core::batch::hash_files;
use dct_phash::core::hasher::{
    DctMethod, FilterScaler, HasherConfig, PerceptualHash, PerceptualHasher, SampleGrid,
};
use dct_phash::error::{CompareError, HashError, PhashError};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn structured_image(size: u32) -> RgbImage {
    let scale = size as f64 / 256.0;
    RgbImage::from_fn(size, size, |x, y| {
        let (fx, fy) = (x as f64 / scale, y as f64 / scale);
        let v = 128.0 + 60.0 * (fx / 19.0).sin() + 45.0 * (fy / 31.0).cos()
            - 20.0 * ((fx + 2.0 * fy) / 23.0).sin();
        let v = v.clamp(0.0, 255.0) as u8;
        Rgb([v, v.saturating_sub(10), v / 2])
    })
}

/// Small xorshift generator so the noise tests are reproducible
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

#[test]
fn identical_file_hashes_to_distance_zero() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("photo.png");
    structured_image(128).save(&path).unwrap();

    let hasher = PerceptualHasher::canonical();
    let scaler = FilterScaler::default();
    let a = hasher.hash_file(&path, &scaler).unwrap();
    let b = hasher.hash_file(&path, &scaler).unwrap();

    assert_eq!(a.len(), 64);
    assert_eq!(a.distance(&b).unwrap(), 0);
}

#[test]
fn reencoded_jpeg_is_a_near_duplicate() {
    let temp_dir = TempDir::new().unwrap();
    let png = temp_dir.path().join("photo.png");
    let jpeg = temp_dir.path().join("photo.jpg");

    let image = DynamicImage::ImageRgb8(structured_image(256));
    image.save(&png).unwrap();
    image.save_with_format(&jpeg, ImageFormat::Jpeg).unwrap();

    let hasher = PerceptualHasher::canonical();
    let scaler = FilterScaler::default();
    let distance = hasher
        .hash_file(&png, &scaler)
        .unwrap()
        .distance(&hasher.hash_file(&jpeg, &scaler).unwrap())
        .unwrap();

    assert!(distance < 10, "re-encoded distance {}", distance);
}

#[test]
fn slight_crop_is_a_near_duplicate() {
    let original = DynamicImage::ImageRgb8(structured_image(256));
    let cropped = original.crop_imm(4, 4, 248, 248);

    let hasher = PerceptualHasher::canonical();
    let scaler = FilterScaler::default();
    let distance = hasher
        .hash_image(&original, &scaler)
        .unwrap()
        .distance(&hasher.hash_image(&cropped, &scaler).unwrap())
        .unwrap();

    assert!(distance < 10, "cropped distance {}", distance);
}

#[test]
fn orthogonal_gradients_differ() {
    let horizontal = GrayImage::from_fn(32, 32, |x, _| Luma([(x * 8) as u8]));
    let vertical = GrayImage::from_fn(32, 32, |_, y| Luma([(y * 8) as u8]));

    let a = dct_phash::hash(&horizontal).unwrap();
    let b = dct_phash::hash(&vertical).unwrap();

    // Each ramp flips its four odd-frequency cells along its own axis
    assert_eq!(dct_phash::distance(&a, &b).unwrap(), 8);
}

#[test]
fn textured_grids_hash_to_known_values() {
    // Every reduced coefficient of these grids sits well clear of the mean,
    // so the values hold for any evaluation order of the sums.
    let modular = GrayImage::from_fn(32, 32, |x, y| {
        Luma([((x * 37 + y * 91 + x * y * 13) % 251) as u8])
    });
    let quadratic = GrayImage::from_fn(32, 32, |x, y| {
        Luma([((x * x + 3 * y * y + 5 * x * y) % 256) as u8])
    });

    let separable = HasherConfig::new().dct(DctMethod::Separable).build().unwrap();
    let cases = [
        (&modular, 0xbfcc_02ec_b38d_a04c_u64),
        (&quadratic, 0x8740_0105_8bff_dfef),
    ];
    for (image, expected) in cases {
        let direct = dct_phash::hash(image).unwrap();
        assert_eq!(direct.to_u64(), Some(expected), "direct: {}", direct.to_hex());
        assert_eq!(separable.hash_source(image).unwrap().to_u64(), Some(expected));
    }
}

#[test]
fn unrelated_noise_is_about_half_the_bits_apart() {
    let hasher = HasherConfig::new().dct(DctMethod::Separable).build().unwrap();
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let mut noise = || SampleGrid::from_fn(32, |_, _| (rng.next() % 65536) as f64);

    let pairs = 30;
    let total: u32 = (0..pairs)
        .map(|_| {
            let a = hasher.hash_grid(&noise()).unwrap();
            let b = hasher.hash_grid(&noise()).unwrap();
            a.distance(&b).unwrap()
        })
        .sum();

    let average = total as f64 / pairs as f64;
    assert!((26.0..=38.0).contains(&average), "average distance {}", average);
}

#[test]
fn wrong_size_is_rejected_not_resized() {
    let result = dct_phash::hash(&GrayImage::new(16, 16));

    assert!(matches!(
        result,
        Err(PhashError::Hash(HashError::DimensionMismatch {
            expected: 32,
            width: 16,
            height: 16
        }))
    ));
}

#[test]
fn hashes_of_different_lengths_are_rejected() {
    let long = PerceptualHash::from_u64(0);
    let short = HasherConfig::new()
        .grid_size(32)
        .hash_size(4)
        .build()
        .unwrap()
        .hash_source(&GrayImage::from_fn(32, 32, |x, y| Luma([(x ^ y) as u8])))
        .unwrap();

    assert_eq!(short.len(), 16);
    assert!(matches!(
        dct_phash::distance(&long, &short),
        Err(PhashError::Compare(CompareError::LengthMismatch { left: 64, right: 16 }))
    ));
}

#[test]
fn batch_hashes_directory_contents() {
    let temp = assert_fs::TempDir::new().unwrap();
    let photo = temp.child("photo.png");
    let copy = temp.child("copy.png");
    let broken = temp.child("broken.jpg");

    structured_image(64).save(photo.path()).unwrap();
    structured_image(64).save(copy.path()).unwrap();
    broken.write_str("this is not a valid image file").unwrap();

    photo.assert(predicate::path::exists());
    broken.assert(predicate::path::is_file());

    let paths = vec![
        photo.path().to_path_buf(),
        copy.path().to_path_buf(),
        broken.path().to_path_buf(),
    ];
    let result = hash_files(&paths, &PerceptualHasher::canonical(), &FilterScaler::default());

    assert_eq!(result.items.len(), 3);
    assert_eq!(result.error_count(), 1);

    let hashes: Vec<_> = result.hashed().map(|(_, hash)| hash.clone()).collect();
    assert_eq!(hashes.len(), 2);
    assert_eq!(hashes[0], hashes[1]);

    temp.close().unwrap();
}

#[test]
fn saved_hash_string_round_trips() {
    let temp = assert_fs::TempDir::new().unwrap();
    let saved = temp.child("photo.phash");

    let hash = PerceptualHasher::canonical()
        .hash_image(&DynamicImage::ImageRgb8(structured_image(100)), &FilterScaler::default())
        .unwrap();
    saved.write_str(&hash.to_string()).unwrap();

    saved.assert(predicate::str::is_match("^[01]{64}$").unwrap());

    let text = std::fs::read_to_string(saved.path()).unwrap();
    let restored: PerceptualHash = text.parse().unwrap();
    assert_eq!(restored, hash);
    assert_eq!(restored.distance(&hash).unwrap(), 0);
}
