//! Themes loaded from disk restyle widgets on the next redraw.

mod common;

use std::io::Write;

use common::{settle, window};
use trellis::render::Color;
use trellis::style::{keys, Fill, Style, Theme};
use trellis::{Area, WidgetBuilder};

const PANEL_URI: &str = "urn:trellis:test#panel";

#[test]
fn theme_file_styles_widgets_by_uri() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r##"
name = "blue"

[widgets."{PANEL_URI}"]
background = "#0000FF"
"##
    )
    .unwrap();

    let mut w = window(60, 40);
    let root = w.root();
    let panel = w.create(
        WidgetBuilder::new("panel")
            .with_uri(PANEL_URI)
            .with_area(Area::new(0.0, 0.0, 30.0, 20.0)),
    );
    w.add(root, panel).unwrap();
    settle(&mut w);
    assert_ne!(w.composed().unwrap().pixel(10, 10), Some(Color::BLUE));

    w.set_theme(Theme::from_file(file.path()).unwrap());
    settle(&mut w);
    assert_eq!(w.composed().unwrap().pixel(10, 10), Some(Color::BLUE));
}

#[test]
fn local_style_overrides_theme() {
    let mut w = window(60, 40);
    let root = w.root();
    let mut theme = Theme::builtin();
    theme.set_widget_style(
        trellis::urid(PANEL_URI),
        Style::new().with(keys::background(), Fill::Solid(Color::BLUE)),
    );
    w.set_theme(theme);

    let panel = w.create(
        WidgetBuilder::new("panel")
            .with_uri(PANEL_URI)
            .with_area(Area::new(0.0, 0.0, 30.0, 20.0))
            .with_style(Style::new().with(keys::background(), Fill::Solid(Color::RED))),
    );
    w.add(root, panel).unwrap();
    settle(&mut w);
    assert_eq!(w.composed().unwrap().pixel(10, 10), Some(Color::RED));
}
