use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use pixmatrix::dispatch::encode_frame;
use pixmatrix::images::NoImages;
use pixmatrix::{scene, AnimationPhase, Compositor, SceneSpec};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

async fn render_digest(json: &str, t: f64) -> String {
    let spec = SceneSpec::from_json(json).expect("parse scene");
    let prepared = scene::prepare(spec.background, &spec.elements, 32, &NoImages).await;
    let frame = Compositor::new(32, 8).render(&prepared, AnimationPhase::at(t), 200);
    // digest the raw RGB rows so goldens do not depend on the deflate backend
    hex::encode(Sha256::digest(frame.as_raw()))
}

fn check_golden(name: &str, digest: &str) {
    let expected_path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let exp = fs::read_to_string(&expected_path).unwrap_or_else(|_| {
        panic!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it.",
            expected_path
        )
    });
    assert_eq!(digest, exp.trim(), "frame digest changed for {}", name);
}

#[tokio::test]
async fn golden_mixed_fonts() {
    let digest = render_digest(
        r#"{"background":[0,0,32],"elements":[
            {"type":"text","content":"Ab1","font":"3x5","color":[255,200,0]},
            {"type":"text","content":"Zg","x":13,"font":"awtrix","color":[0,255,128]},
            {"type":"text","content":"42","x":21,"y":1}
        ]}"#,
        0.0,
    )
    .await;
    check_golden("mixed_fonts.sha256", &digest);
}

#[tokio::test]
async fn golden_scroll_midway() {
    let digest = render_digest(
        r#"{"elements":[{"type":"scroll_text","content":"Hello","speed":20,"color":[255,0,0]}]}"#,
        0.9,
    )
    .await;
    check_golden("scroll_midway.sha256", &digest);
}

#[tokio::test]
async fn golden_translucent_pixels() {
    let digest = render_digest(
        r#"{"background":[255,255,255],"elements":[
            {"type":"pixels","pixels":[[0,0,255,0,0,128],[1,0,0,0,255],[2,0,0,255,0,0]]}
        ]}"#,
        0.0,
    )
    .await;
    check_golden("translucent_pixels.sha256", &digest);
}

#[tokio::test]
async fn encoded_frames_are_stable_across_renders() {
    let spec = SceneSpec::from_json(r#"{"elements":[{"type":"text","content":"PNG"}]}"#).unwrap();
    let prepared = scene::prepare(spec.background, &spec.elements, 32, &NoImages).await;
    let mut c = Compositor::new(32, 8);
    let a = encode_frame(&c.render(&prepared, AnimationPhase::at(0.0), 255)).unwrap();
    let b = encode_frame(&c.render(&prepared, AnimationPhase::at(3.0), 255)).unwrap();
    assert_eq!(Sha256::digest(&a), Sha256::digest(&b));
}

#[tokio::test]
async fn identical_scenes_share_a_digest() {
    let json = r#"{"elements":[{"type":"text","content":"Same"}]}"#;
    assert_eq!(render_digest(json, 0.0).await, render_digest(json, 5.0).await);
}
