use console::Style;
use starmath_core::detection::Star;
use starmath_core::pipeline::{OperandStep, PipelineConfig, ViewStep};
use starmath_core::stats::median;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Starmath Pipeline"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(17)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    match config.output {
        Some(ref output) => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(output.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.disabled.apply_to("none")
        ),
    }
    println!();

    if config.steps.is_empty() {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Steps"),
            s.disabled.apply_to("none")
        );
    } else {
        println!("  {}", s.header.apply_to("Steps"));
        for (i, step) in config.steps.iter().enumerate() {
            let (name, detail) = describe_step(step);
            println!(
                "    {}. {} {}",
                s.label.apply_to(i + 1),
                s.method.apply_to(name),
                s.value.apply_to(detail)
            );
        }
    }
    println!();
}

fn describe_step(step: &ViewStep) -> (&'static str, String) {
    match step {
        ViewStep::Arithmetic { op, operand } => {
            let rhs = match operand {
                OperandStep::Scalar(v) => v.to_string(),
                OperandStep::Image(path) => path.display().to_string(),
            };
            (op.name(), rhs)
        }
        ViewStep::ScaleUp { factor, .. } => ("scale_up", format!("x{factor}")),
        ViewStep::ScaleDown { factor, .. } => ("scale_down", format!("/{factor}")),
        ViewStep::Crop(r) => (
            "crop",
            format!("{}x{} at ({}, {})", r.width, r.height, r.x, r.y),
        ),
        ViewStep::CropFromCenter(size) => {
            ("crop_from_center", format!("{}x{}", size.width, size.height))
        }
        ViewStep::Stretch(method) => ("stretch", format!("{method:?}")),
        ViewStep::SubtractBackground(method) => ("subtract_background", format!("{method:?}")),
        ViewStep::InterpolateBadPixels(config) => (
            "interpolate_bad_pixels",
            format!("threshold {} core {}", config.threshold, config.core_size),
        ),
        ViewStep::Blur { sigma } => ("blur", format!("sigma {sigma}")),
        ViewStep::DetectStars(config) => ("detect_stars", format!("{:?}", config.threshold)),
        ViewStep::CenterOnStar { selection, size } => (
            "center_on_star",
            match size {
                Some(size) => format!("{selection:?} {}x{}", size.width, size.height),
                None => format!("{selection:?}"),
            },
        ),
        ViewStep::Write { path, .. } => ("write", path.display().to_string()),
    }
}

/// Star list, brightest first, plus median shape metrics.
pub fn print_star_table(stars: &[Star], background: Option<f32>, top: Option<usize>) {
    let s = Styles::new();

    if stars.is_empty() {
        println!("  {}", s.disabled.apply_to("No stars detected"));
        return;
    }

    let mut order: Vec<usize> = (0..stars.len()).collect();
    order.sort_by(|&a, &b| stars[b].flux.total_cmp(&stars[a].flux));
    let shown = top.unwrap_or(stars.len()).min(stars.len());

    println!(
        "  {}",
        s.header.apply_to(format!("{} stars (showing {})", stars.len(), shown))
    );
    println!(
        "  {:>5}  {:>9}  {:>9}  {:>12}  {:>7}  {:>7}  {:>8}",
        "#", "X", "Y", "Flux", "HFD", "FWHM", "SNR"
    );
    println!("  {}", "-".repeat(70));
    for &i in order.iter().take(shown) {
        let star = &stars[i];
        println!(
            "  {:>5}  {:>9.2}  {:>9.2}  {:>12.1}  {:>7.2}  {:>7.2}  {:>8.1}",
            i + 1,
            star.centroid.x,
            star.centroid.y,
            star.flux,
            star.hfd,
            star.fwhm,
            star.snr
        );
    }

    let mut hfds: Vec<f32> = stars.iter().map(|s| s.hfd as f32).collect();
    let mut fwhms: Vec<f32> = stars.iter().map(|s| s.fwhm as f32).collect();
    println!();
    if let Some(bg) = background {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Background"),
            s.value.apply_to(format!("{bg:.2}"))
        );
    }
    if let (Some(hfd), Some(fwhm)) = (median(&mut hfds), median(&mut fwhms)) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Median HFD"),
            s.value.apply_to(format!("{hfd:.2}"))
        );
        println!(
            "  {:<14}{}",
            s.label.apply_to("Median FWHM"),
            s.value.apply_to(format!("{fwhm:.2}"))
        );
    }
}
