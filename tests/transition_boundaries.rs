use image::{Rgb, RgbImage};

use pixmatrix::animation::Transition;
use pixmatrix::rendering::transition::{eased_steps, step_count, TransitionKind};
use pixmatrix::Frame;

fn gradient(w: u32, h: u32, base: u8) -> Frame {
    Frame::from_image(RgbImage::from_fn(w, h, |x, y| {
        Rgb([base, (x * 7) as u8, (y * 29) as u8])
    }))
}

fn transition(kind: &str, duration: f64, fps: u32) -> Transition {
    Transition {
        from: gradient(32, 8, 200),
        to: gradient(32, 8, 10),
        kind: TransitionKind::from(kind),
        duration,
        fps,
        background: [0, 0, 0],
    }
}

#[test]
fn slide_left_one_second_at_twenty_fps() {
    assert_eq!(step_count(1.0, 20), 20);
    let t = transition("slide_left", 1.0, 20);
    let frames: Vec<Frame> = t.frames().collect();
    assert_eq!(frames.len(), 21);
    assert_eq!(frames[0], t.from);
    assert_eq!(frames[20], t.to);
    assert!(frames[1..20].iter().all(|f| *f != t.to));
}

#[test]
fn every_kind_hits_both_endpoints() {
    for kind in ["slide_up", "slide_down", "slide_left", "slide_right", "dissolve", "sparkle"] {
        for (duration, fps) in [(1.0, 20), (0.3, 7), (0.0, 20), (2.5, 30)] {
            let t = transition(kind, duration, fps);
            let frames: Vec<Frame> = t.frames().collect();
            assert!(frames.len() >= 2, "{} {}@{}", kind, duration, fps);
            assert_eq!(frames.first(), Some(&t.from), "{} {}@{}", kind, duration, fps);
            assert_eq!(frames.last(), Some(&t.to), "{} {}@{}", kind, duration, fps);
        }
    }
}

#[test]
fn eased_progress_is_monotonic() {
    let values: Vec<f64> = eased_steps(20).collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    // ease-out front-loads the motion
    assert!(values[10] > 0.5);
}

#[test]
fn slide_up_reveals_background_only_with_mismatched_sizes() {
    let t = Transition {
        from: Frame::filled(4, 2, [255, 255, 255]),
        to: Frame::filled(8, 4, [0, 0, 255]),
        kind: TransitionKind::SlideUp,
        duration: 1.0,
        fps: 4,
        background: [7, 7, 7],
    };
    let frames: Vec<Frame> = t.frames().collect();
    assert_eq!(frames[0].pixel(7, 0), [7, 7, 7]);
    assert_eq!(frames[0].pixel(0, 0), [255, 255, 255]);
    assert_eq!(frames.last(), Some(&t.to));
}
