//! Integration tests for offscreen surfaces and the drawing context.

use std::f64::consts::PI;

use trellis_core::{Area, Point};
use trellis_render::{Color, DrawContext, ImageSurface, LinearGradient, RenderError};

#[test]
fn test_png_write_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swatch.png");

    let mut surface = ImageSurface::new(8, 4).unwrap();
    surface.fill(Color::from_rgba8(10, 200, 30, 255));
    surface.write_png(&path).unwrap();

    let loaded = ImageSurface::from_png_file(&path).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (8, 4));
    assert_eq!(loaded.pixel(7, 3), Some(Color::from_rgba8(10, 200, 30, 255)));
}

#[test]
fn test_missing_png_reports_path() {
    let err = ImageSurface::from_png_file("/nonexistent/trellis.png").unwrap_err();
    match err {
        RenderError::ImageLoad { path, .. } => assert!(path.ends_with("trellis.png")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_linear_gradient_fill() {
    let mut surface = ImageSurface::new(100, 10).unwrap();
    {
        let mut cr = DrawContext::new(&mut surface);
        cr.rectangle(0.0, 0.0, 100.0, 10.0);
        cr.set_source_linear(
            LinearGradient::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))
                .with_stop(0.0, Color::BLACK)
                .with_stop(1.0, Color::WHITE),
        );
        cr.fill().unwrap();
    }
    let left = surface.pixel(2, 5).unwrap();
    let right = surface.pixel(97, 5).unwrap();
    assert!(left.r < 0.1);
    assert!(right.r > 0.9);
    assert!(surface.pixel(50, 5).unwrap().r > left.r);
}

#[test]
fn test_circle_from_arc() {
    let mut surface = ImageSurface::new(40, 40).unwrap();
    {
        let mut cr = DrawContext::new(&mut surface);
        cr.arc(20.0, 20.0, 10.0, 0.0, 2.0 * PI);
        cr.set_source_color(Color::RED);
        cr.fill().unwrap();
    }
    assert_eq!(surface.pixel(20, 20), Some(Color::RED));
    assert_eq!(surface.pixel(12, 20).map(|c| c.a > 0.9), Some(true));
    // Corners of the bounding box stay outside the circle.
    assert_eq!(surface.pixel(11, 11), Some(Color::TRANSPARENT));
}

#[test]
fn test_rounded_rectangle_corners_are_cut() {
    let mut surface = ImageSurface::new(30, 30).unwrap();
    {
        let mut cr = DrawContext::new(&mut surface);
        cr.rounded_rectangle(0.0, 0.0, 30.0, 30.0, 10.0);
        cr.set_source_color(Color::BLUE);
        cr.fill().unwrap();
    }
    assert_eq!(surface.pixel(15, 15), Some(Color::BLUE));
    assert_eq!(surface.pixel(0, 0), Some(Color::TRANSPARENT));
    assert_eq!(surface.pixel(15, 0), Some(Color::BLUE));
}

#[test]
fn test_stroke_only_touches_outline() {
    let mut surface = ImageSurface::new(20, 20).unwrap();
    {
        let mut cr = DrawContext::new(&mut surface);
        cr.rectangle(4.0, 4.0, 12.0, 12.0);
        cr.set_line_width(2.0);
        cr.set_source_color(Color::WHITE);
        cr.stroke().unwrap();
    }
    assert_eq!(surface.pixel(4, 10), Some(Color::WHITE));
    assert_eq!(surface.pixel(10, 10), Some(Color::TRANSPARENT));
}

#[test]
fn test_surface_source_paint() {
    let mut tile = ImageSurface::new(5, 5).unwrap();
    tile.fill(Color::GREEN);

    let mut surface = ImageSurface::new(20, 20).unwrap();
    {
        let mut cr = DrawContext::new(&mut surface);
        cr.set_source_surface(&tile, 10.0, 10.0);
        cr.paint().unwrap();
    }
    assert_eq!(surface.pixel(12, 12), Some(Color::GREEN));
    assert_eq!(surface.pixel(2, 2), Some(Color::TRANSPARENT));
    assert_eq!(surface.pixel(17, 17), Some(Color::TRANSPARENT));
}

#[test]
fn test_blit_under_clip() {
    let mut tile = ImageSurface::new(10, 10).unwrap();
    tile.fill(Color::RED);

    let mut surface = ImageSurface::new(20, 20).unwrap();
    {
        let mut cr = DrawContext::new(&mut surface);
        cr.rectangle(0.0, 0.0, 5.0, 20.0);
        cr.clip();
        cr.blit(&tile, Point::ZERO, Area::new(0.0, 0.0, 10.0, 10.0));
    }
    assert_eq!(surface.pixel(2, 2), Some(Color::RED));
    assert_eq!(surface.pixel(7, 2), Some(Color::TRANSPARENT));
}
