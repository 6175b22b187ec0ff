//! Command-line front end: settings and an optional image in, PNG out.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use badge_renderer::{
    init_logging, GlyphTable, IconSettings, ImageInput, LoggingConfig, RasterDecoder,
    RenderPipeline, StyleVariant, SvgTextRasterizer,
};
use clap::Parser;
use resvg::usvg::fontdb;

/// Render a badge icon to PNG
#[derive(Parser, Debug)]
#[command(name = "badge-render")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Icon settings as a JSON file (camelCase keys)
    #[arg(short = 's', long = "settings")]
    settings: Option<PathBuf>,

    /// Image to place on the icon
    #[arg(short = 'i', long = "image")]
    image: Option<PathBuf>,

    /// Declared MIME type of the image (sniffed when omitted)
    #[arg(long = "content-type", requires = "image")]
    content_type: Option<String>,

    /// Glyph table as a JSON file mapping icon classes to codepoints
    #[arg(short = 'g', long = "glyphs")]
    glyphs: Option<PathBuf>,

    /// Extra directory to load fonts from
    #[arg(long = "font-dir")]
    font_dir: Option<PathBuf>,

    /// Icon width in pixels
    #[arg(short = 'w', long = "width")]
    width: Option<u32>,

    /// Style variant
    #[arg(long = "style", value_enum)]
    style: Option<StyleVariant>,

    /// Background color
    #[arg(short = 'b', long = "background")]
    background: Option<String>,

    /// Icon-font class, e.g. "fas fa-carrot"
    #[arg(short = 'c', long = "class")]
    icon_class: Option<String>,

    /// Explicit glyph text ("none" for no glyph)
    #[arg(short = 't', long = "text")]
    icon_text: Option<String>,

    /// Output PNG path
    #[arg(short = 'o', long = "out", default_value = "icon.png")]
    out: PathBuf,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> badge_renderer::Result<IconSettings> {
        let mut settings = match &self.settings {
            Some(path) => IconSettings::from_json(&std::fs::read_to_string(path)?)?,
            None => IconSettings::new(),
        };
        if let Some(width) = self.width {
            settings = settings.with_icon_width(width);
        }
        if let Some(style) = self.style {
            settings = settings.with_style_variant(style.label());
        }
        if let Some(background) = &self.background {
            settings = settings.with_icon_background(background);
        }
        if let Some(class) = &self.icon_class {
            settings = settings.with_icon_class(class);
        }
        if let Some(text) = &self.icon_text {
            settings = settings.with_icon_text(text);
        }
        Ok(settings)
    }

    fn image(&self) -> badge_renderer::Result<Option<ImageInput>> {
        let Some(path) = &self.image else {
            return Ok(None);
        };
        let mut input = ImageInput::new(std::fs::read(path)?);
        if let Some(content_type) = &self.content_type {
            input = input.with_content_type(content_type);
        }
        Ok(Some(input))
    }

    fn glyphs(&self) -> badge_renderer::Result<GlyphTable> {
        match &self.glyphs {
            Some(path) => Ok(GlyphTable::from_json(&std::fs::read_to_string(path)?)?),
            None => Ok(GlyphTable::new()),
        }
    }

    fn rasterizer(&self) -> SvgTextRasterizer {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = &self.font_dir {
            db.load_fonts_dir(dir);
        }
        log::debug!("{} font faces available", db.len());
        SvgTextRasterizer::new(Arc::new(db))
    }
}

fn run(cli: &Cli) -> badge_renderer::Result<()> {
    let settings = cli.settings()?;
    let image = cli.image()?;
    let mut pipeline = RenderPipeline::with_parts(cli.glyphs()?, RasterDecoder, cli.rasterizer());

    let output = pipeline.render_blocking(&settings, image.as_ref())?;
    if !output.warnings.is_empty() {
        log::info!("rendered with {} warning(s)", output.warnings.len());
    }

    std::fs::write(&cli.out, output.surface.to_png_bytes()?)?;
    log::info!(
        "wrote {}x{} icon to {}",
        output.surface.width(),
        output.surface.height(),
        cli.out.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    });

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
