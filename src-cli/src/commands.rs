//! Subcommand implementations

use anyhow::{Context, Result};
use layout_engine::{
    DiagramKind, HandwritingEngine, PageRenderer, Paginator, RenderSession, RenderedPage,
};
use render_model::{EntropyRandom, InkFont, PooledRandom, RandomSource};
use std::path::Path;
use store::{JsonStyleStore, StyleStore};
use style_model::{EngineSettings, HandwritingStyle, PageConfig, PaperType, SettingsManager, StyleProfile};

/// Inputs of `render` beyond the answer file and output directory
pub struct RenderOptions<'a> {
    pub subject: String,
    pub diagram: Option<DiagramKind>,
    pub style: Option<&'a Path>,
    pub settings: Option<&'a Path>,
    pub font: Option<&'a Path>,
    pub paper: PaperType,
    pub seed: Option<u64>,
}

pub fn cmd_plan(
    input: &Path,
    subject: &str,
    diagram: Option<DiagramKind>,
    settings: Option<&Path>,
) -> Result<()> {
    let answer = read_answer(input)?;
    let settings = load_settings(settings)?;

    let plan = Paginator::from_settings(&settings).plan(&answer, subject, diagram.is_some(), diagram);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

pub async fn cmd_render(input: &Path, out: &Path, options: &RenderOptions<'_>) -> Result<()> {
    let answer = read_answer(input)?;
    let settings = load_settings(options.settings)?;
    let style = match options.style {
        Some(path) => load_style(path)?,
        None => HandwritingStyle::default(),
    };

    let plan = Paginator::from_settings(&settings).plan(
        &answer,
        &options.subject,
        options.diagram.is_some(),
        options.diagram,
    );

    let mut engine = HandwritingEngine::with_page(PageConfig::a4().with_paper(options.paper))
        .with_settings(settings)
        .with_random(random_source(options.seed));
    if let Some(path) = options.font {
        let font = InkFont::from_file(path).with_context(|| format!("loading font {}", path.display()))?;
        engine = engine.with_font(font);
    }
    match engine.font() {
        Some(font) => tracing::info!("Writing with font {:?}", font.family()),
        None => tracing::warn!("No font available; page images will carry strokes only"),
    }
    let mut renderer = PageRenderer::new(engine, style);

    let session = RenderSession::new();
    let pages = renderer.render_plan(&plan, &session.begin()).await?;

    std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    for page in pages {
        write_page(out, page)?;
    }
    tracing::info!("Wrote {} page(s) to {}", plan.total_pages, out.display());
    Ok(())
}

pub fn cmd_extract_style(input: &Path, name: Option<&str>, save: Option<&Path>) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let result = style_extract::extract_style(&bytes);

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let profile = StyleProfile::from_extraction(name.unwrap_or(&file_name), &result);

    if let Some(dir) = save {
        JsonStyleStore::new(dir).create(profile.clone())?;
        tracing::info!("Saved style profile {} to {}", profile.id, dir.display());
    }

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

fn read_answer(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Settings from `path`, or the defaults when no file is given
fn load_settings(path: Option<&Path>) -> Result<EngineSettings> {
    let Some(path) = path else {
        return Ok(EngineSettings::default());
    };
    let mut manager = SettingsManager::new(path);
    Ok(manager.load_sync()?.clone())
}

/// Accepts either a bare style or a saved style profile
fn load_style(path: &Path) -> Result<HandwritingStyle> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let style = match serde_json::from_str::<HandwritingStyle>(&content) {
        Ok(style) => style,
        Err(_) => {
            serde_json::from_str::<StyleProfile>(&content)
                .with_context(|| format!("{} is neither a style nor a style profile", path.display()))?
                .style
        }
    };
    style.validate()?;
    Ok(style)
}

/// A seeded pool when reproducibility is asked for, fresh entropy otherwise
fn random_source(seed: Option<u64>) -> Box<dyn RandomSource + Send> {
    match seed {
        Some(seed) => Box::new(PooledRandom::seeded(seed)),
        None => Box::new(EntropyRandom::new()),
    }
}

/// Write the inked page as PNG and its display list as JSON
fn write_page(out: &Path, page: RenderedPage) -> Result<()> {
    let (pixels, items) = page.surface.into_parts();

    let png = out.join(format!("page-{}.png", page.page_number));
    pixels
        .save(&png)
        .with_context(|| format!("writing {}", png.display()))?;

    let json = out.join(format!("page-{}.json", page.page_number));
    std::fs::write(&json, serde_json::to_string_pretty(&items)?)
        .with_context(|| format!("writing {}", json.display()))?;

    tracing::debug!("Wrote {} and {}", png.display(), json.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_style_accepts_profile() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("profile.json");
        let profile = StyleProfile::new("Neat", HandwritingStyle::neat());
        std::fs::write(&path, serde_json::to_string(&profile).unwrap()).unwrap();

        assert_eq!(load_style(&path).unwrap(), HandwritingStyle::neat());
    }

    #[test]
    fn test_load_style_rejects_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("style.json");
        let style = HandwritingStyle {
            size: 0.0,
            ..HandwritingStyle::default()
        };
        std::fs::write(&path, serde_json::to_string(&style).unwrap()).unwrap();

        assert!(load_style(&path).is_err());
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(Some(&temp.path().join("absent.json"))).unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[tokio::test]
    async fn test_render_writes_page_files() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("answer.txt");
        std::fs::write(&input, "**Given** $x^2 = 4$\n- so x = 2").unwrap();
        let out = temp.path().join("pages");

        let options = RenderOptions {
            subject: "Maths".to_string(),
            diagram: Some(DiagramKind::Graph),
            style: None,
            settings: None,
            font: None,
            paper: PaperType::Grid,
            seed: Some(7),
        };
        cmd_render(&input, &out, &options).await.unwrap();

        let png = image::open(out.join("page-1.png")).unwrap().to_rgba8();
        // Grid paper is light; the pencil graph and list dot are not
        assert!(png.pixels().filter(|p| p.0[0] < 150).count() > 100);
        let items: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("page-1.json")).unwrap()).unwrap();
        assert!(!items.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_render_rejects_unreadable_font() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("answer.txt");
        std::fs::write(&input, "x").unwrap();
        let font = temp.path().join("hand.ttf");
        std::fs::write(&font, "not a font").unwrap();

        let options = RenderOptions {
            subject: "S".to_string(),
            diagram: None,
            style: None,
            settings: None,
            font: Some(&font),
            paper: PaperType::Plain,
            seed: Some(1),
        };
        let err = cmd_render(&input, &temp.path().join("pages"), &options)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("loading font"));
    }

    #[test]
    fn test_extract_style_saves_profile() {
        let temp = TempDir::new().unwrap();
        let sample = temp.path().join("sample.png");
        image::RgbImage::from_pixel(64, 64, image::Rgb([255, 255, 255]))
            .save(&sample)
            .unwrap();
        let styles = temp.path().join("styles");

        cmd_extract_style(&sample, None, Some(&styles)).unwrap();

        let saved = JsonStyleStore::new(&styles).list().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "sample");
    }
}
