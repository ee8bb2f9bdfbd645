use pixmatrix::images::NoImages;
use pixmatrix::scene::{self, Direction, TextRun};
use pixmatrix::{AnimationPhase, Color, Compositor, Element, FontId, Scene, SceneSpec};

fn text_at(content: &str, x: i32, y: i32) -> Element {
    Element::Text(TextRun {
        content: content.to_string(),
        x,
        y,
        color: Color::WHITE,
        font: FontId::Medium5x7,
        spacing: 1,
    })
}

fn lit(frame: &pixmatrix::Frame) -> usize {
    frame.image().pixels().filter(|p| p.0 != [0, 0, 0]).count()
}

#[tokio::test]
async fn smoke_render_json_scene() {
    let spec = SceneSpec::from_json(
        r#"{"background":[0,0,40],"elements":[
            {"type":"text","content":"Hi","x":1,"y":0,"color":[255,0,0]},
            {"type":"pixels","pixels":[[31,7,0,255,0],[0,0]]}
        ]}"#,
    )
    .unwrap();
    let prepared = scene::prepare(spec.background, &spec.elements, 32, &NoImages).await;
    assert_eq!(prepared.elements.len(), 2);

    let mut c = Compositor::new(32, 8);
    let frame = c.render(&prepared, AnimationPhase::at(0.0), 255);
    assert_eq!((frame.width(), frame.height()), (32, 8));
    assert_eq!(frame.pixel(31, 7), [0, 255, 0]);
    assert_eq!(frame.pixel(20, 7), [0, 0, 40]);
    assert!(frame.image().pixels().any(|p| p.0 == [255, 0, 0]));
}

#[test]
fn brightness_zero_renders_black() {
    let scene = Scene::new(Color::WHITE, vec![text_at("88", 0, 0)]);
    let mut c = Compositor::new(16, 8);
    let frame = c.render(&scene, AnimationPhase::at(0.0), 0);
    assert_eq!(lit(&frame), 0);
}

fn two_line_cycle() -> Scene {
    Scene::new(
        Color::BLACK,
        vec![Element::WrappedText(pixmatrix::scene::CyclingText {
            lines: vec!["AB".to_string(), "CD".to_string()],
            x: 0,
            y: 0,
            color: Color::WHITE,
            font: FontId::Medium5x7,
            spacing: 1,
            hold: 2.0,
            slide: 0.5,
            direction: Direction::Up,
        })],
    )
}

#[test]
fn cycle_shows_first_line_during_hold() {
    let mut c = Compositor::new(32, 8);
    let cycling = c.render(&two_line_cycle(), AnimationPhase::at(0.5), 255);
    let only_first = c.render(
        &Scene::new(Color::BLACK, vec![text_at("AB", 0, 0)]),
        AnimationPhase::at(0.0),
        255,
    );
    assert_eq!(cycling, only_first);
}

#[test]
fn cycle_mid_slide_offsets_both_lines_by_half_a_step() {
    let mut c = Compositor::new(32, 8);
    let cycling = c.render(&two_line_cycle(), AnimationPhase::at(2.25), 255);
    // 5x7 cell height is 7; half of it truncates to 3
    let expected = c.render(
        &Scene::new(Color::BLACK, vec![text_at("AB", 0, -3), text_at("CD", 0, 4)]),
        AnimationPhase::at(0.0),
        255,
    );
    assert_eq!(cycling, expected);
    assert!(lit(&cycling) > 0);
}

#[test]
fn scroll_text_enters_from_the_right() {
    let scene = Scene::new(
        Color::BLACK,
        vec![Element::ScrollText(pixmatrix::scene::ScrollingText {
            run: TextRun {
                content: "I".to_string(),
                x: 0,
                y: 0,
                color: Color::WHITE,
                font: FontId::Medium5x7,
                spacing: 1,
            },
            speed: 10.0,
        })],
    );
    let mut c = Compositor::new(32, 8);
    assert_eq!(lit(&c.render(&scene, AnimationPhase::at(0.0), 255)), 0);
    assert!(lit(&c.render(&scene, AnimationPhase::at(1.0), 255)) > 0);
}

#[test]
fn glyph_cache_is_reused_across_frames() {
    let scene = Scene::new(Color::BLACK, vec![text_at("ABBA", 0, 0)]);
    let mut c = Compositor::new(32, 8);
    c.render(&scene, AnimationPhase::at(0.0), 255);
    let entries = c.glyph_cache().len();
    assert_eq!(entries, 2);
    c.render(&scene, AnimationPhase::at(1.0), 255);
    assert_eq!(c.glyph_cache().len(), entries);
}
