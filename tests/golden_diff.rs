use std::fs;
use std::path::PathBuf;

use pagediff::rendering::encode::encode;
use pagediff::{compare, OutputFormat, PixelBuffer};
use sha2::{Digest, Sha256};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn encoded(diff: &PixelBuffer, format: OutputFormat) -> Vec<u8> {
    let mut out = Vec::new();
    encode(diff, format, &mut out).expect("encode to memory");
    out
}

#[test]
fn golden_ppm_matches_digest() {
    // White 3x2 page; the second render has two changed pixels on a diagonal
    let before = PixelBuffer::packed(3, 2, 3, vec![255; 18]).unwrap();
    let mut after = vec![255; 18];
    after[3..6].copy_from_slice(&[0, 0, 0]);
    after[15..18].copy_from_slice(&[200, 255, 255]);
    let after = PixelBuffer::packed(3, 2, 3, after).unwrap();

    let diff = compare(&before, &after).unwrap();
    let ppm = encoded(&diff, OutputFormat::Ppm);
    let digest = hex::encode(Sha256::digest(&ppm));

    let expected_path = golden_path("diagonal_diff.ppm.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, format!("{}\n", digest)).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, exp.trim(), "PPM output:\n{}", String::from_utf8_lossy(&ppm));
}
