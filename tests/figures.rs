// End-to-end figure creation and saving

use pubplot::figure::Side;
use pubplot::fonts::manager;
use pubplot::{
    apply_style, Error, FigureOptions, PlotConfig, Plotting, SaveOptions, StyleParams, Unit,
};
use serial_test::serial;

fn two_panels() -> (pubplot::Plot, pubplot::figure::AxesGrid) {
    let plotting = Plotting::new(PlotConfig::default());
    let options = FigureOptions::grid(1, 2)
        .size(10.0, 10.0, Unit::Centimeter)
        .share(true, true);
    plotting.create_figure(options).unwrap()
}

#[test]
fn create_styled_grid() {
    let (plot, axes) = two_panels();
    assert_eq!(axes.len(), 2);
    assert!(plot.style_applied());
    for id in axes.iter() {
        let ax = &plot[id];
        assert!(!ax.spines[Side::Top].visible);
        assert!(!ax.spines[Side::Right].visible);
        assert_eq!(ax.spines[Side::Left].width, 1.4);
        assert_eq!(ax.spines[Side::Bottom].width, 1.4);
        assert_eq!(ax.spines[Side::Left].offset, 5.0);
        assert_eq!(ax.spines[Side::Bottom].offset, 5.0);
    }
    // sharey hides the inner y tick labels
    assert!(plot[axes[0]].shows_yticklabels());
    assert!(!plot[axes[1]].shows_yticklabels());
}

#[test]
fn style_is_idempotent() {
    let (mut plot, _) = two_panels();
    let before = plot.axes().to_vec();
    apply_style(&mut plot, &StyleParams::default()).unwrap();
    apply_style(&mut plot, &StyleParams::default()).unwrap();
    assert_eq!(plot.axes(), before.as_slice());
    assert!(plot.axes().iter().all(|ax| ax.grid().is_some()));
}

#[test]
fn save_formats() {
    let dir = tempfile::tempdir().unwrap();
    let (mut plot, axes) = two_panels();
    plot[axes[0]]
        .plot(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 4.0, 9.0])
        .unwrap();
    plot[axes[0]].set_xlabel("x");
    plot[axes[0]].set_ylabel("y");
    plot[axes[1]].set_title("empty");

    let options = SaveOptions::default();
    let svg = plot.save("test.svg", Some(dir.path()), true, &options).unwrap();
    let text = std::fs::read_to_string(&svg).unwrap();
    assert!(text.starts_with("<svg"));
    assert!(text.contains(">empty</text>"));

    #[cfg(feature = "pdf")]
    {
        let pdf = plot.save("test.pdf", Some(dir.path()), true, &options).unwrap();
        let bytes = std::fs::read(pdf).unwrap();
        assert!(bytes.len() > 0);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[cfg(feature = "png")]
    {
        let png = plot.save("test", Some(dir.path()), true, &options).unwrap();
        assert_eq!(png, dir.path().join("test.png"));
        assert!(std::fs::metadata(png).unwrap().len() > 0);
    }

    assert!(matches!(
        plot.save("test.gif", Some(dir.path()), true, &options),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
#[serial]
fn save_to_current_dir() {
    let dir = tempfile::tempdir().unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let (mut plot, _) = two_panels();
    let result = plot.save("here.svg", None, true, &SaveOptions::default());
    std::env::set_current_dir(previous).unwrap();

    let path = result.unwrap();
    assert_eq!(path.file_name().unwrap(), "here.svg");
    assert!(dir.path().join("here.svg").is_file());
}

#[test]
fn unknown_font_is_unavailable() {
    assert!(!manager().is_available("NonexistentFontXYZ"));
}

#[test]
fn create_figure_validates() {
    let plotting = Plotting::default();
    assert!(matches!(
        plotting.create_figure(FigureOptions::grid(1, 0)),
        Err(Error::InvalidLayout { .. })
    ));
    assert!(matches!(
        plotting.create_figure(FigureOptions::new().size(-1.0, 5.0, Unit::Inch)),
        Err(Error::InvalidDimensions { .. })
    ));
    assert!(matches!(
        "mm".parse::<Unit>(),
        Err(Error::InvalidUnit(unit)) if unit == "mm"
    ));
}
