//! Interactive prompt session.
//!
//! Asks for every input line by line and validates each answer as soon as
//! it is given; the first invalid answer ends the session with its error.

use crate::compositor::Compositor;
use crate::core::config::{BlendConfig, DimensionMode, Placement};
use crate::core::error::{WatermarkError, WatermarkResult};
use crate::core::types::{Raster, RasterRole};
use crate::io::load_raster;
use crate::validation::rules;
use crate::workflow::job::PreparedJob;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Answer that enables an optional feature. Anything else declines.
const YES: &str = "yes";

/// Prompt-driven collection of a [`PreparedJob`].
pub struct InteractiveSession<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveSession<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Ask every question and build a validated job.
    pub fn collect(&mut self) -> WatermarkResult<PreparedJob> {
        let base = self.ask_raster(RasterRole::Image)?;
        let watermark = self.ask_raster(RasterRole::Watermark)?;
        rules::validate_dimensions(&base, &watermark, DimensionMode::Fit)?;

        let transparency_color = if watermark.has_alpha() {
            None
        } else if self.confirm("Do you want to set a transparency color?")? {
            let answer = self.ask("Input a transparency color ([Red] [Green] [Blue]):")?;
            Some(rules::validate_transparency_color(&answer)?)
        } else {
            None
        };

        let use_alpha = watermark.has_alpha()
            && self.confirm("Do you want to use the watermark's Alpha channel?")?;

        let answer = self.ask("Input the watermark transparency percentage (Integer 0-100):")?;
        let weight = rules::validate_weight(&answer)?;

        let answer = self.ask("Choose the position method (single, grid):")?;
        let placement = match Placement::parse_method(&answer)? {
            Placement::Single { .. } => {
                let (max_x, max_y) = rules::max_position(&base, &watermark);
                let answer = self.ask(&format!(
                    "Input the watermark position ([x 0-{}] [y 0-{}]):",
                    max_x, max_y
                ))?;
                rules::parse_placement(&answer, &base, &watermark)?
            }
            Placement::Grid => Placement::Grid,
        };

        let answer = self.ask("Input the output image filename (jpg or png extension):")?;
        let output = PathBuf::from(answer.trim());
        rules::validate_output_path(&output)?;

        let config = BlendConfig::builder(weight)
            .use_alpha(use_alpha)
            .transparency_color(transparency_color)
            .placement(placement)
            .build()?;

        Ok(PreparedJob::new(base, watermark, config, output)?)
    }

    /// Collect a job, composite it and write the output file.
    pub fn run(&mut self, compositor: &Compositor, jpeg_quality: u8) -> WatermarkResult<PathBuf> {
        let job = self.collect()?;
        let path = job.run(compositor, jpeg_quality)?;
        writeln!(
            self.output,
            "The watermarked image {} has been created.",
            path.display()
        )?;
        Ok(path)
    }

    fn ask_raster(&mut self, role: RasterRole) -> WatermarkResult<Raster> {
        let prompt = match role {
            RasterRole::Image => "Input the image filename:",
            RasterRole::Watermark => "Input the watermark image filename:",
        };
        let answer = self.ask(prompt)?;
        let raster = load_raster(answer.trim())?;
        rules::validate_color_depth(&raster, role)?;
        Ok(raster)
    }

    fn confirm(&mut self, prompt: &str) -> WatermarkResult<bool> {
        Ok(self.ask(prompt)?.trim() == YES)
    }

    fn ask(&mut self, prompt: &str) -> WatermarkResult<String> {
        writeln!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(WatermarkError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before all questions were answered",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::CompositeOptions;
    use crate::core::error::{ErrorKind, ValidationError};
    use crate::core::types::Color;
    use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let base: RgbImage = ImageBuffer::from_pixel(4, 4, Rgb([200, 200, 200]));
            base.save(dir.path().join("base.png")).unwrap();
            let mark: RgbImage = ImageBuffer::from_pixel(2, 2, Rgb([255, 255, 255]));
            mark.save(dir.path().join("mark.png")).unwrap();
            let alpha: RgbaImage = ImageBuffer::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
            alpha.save(dir.path().join("alpha.png")).unwrap();
            Self { dir }
        }

        fn path(&self, name: &str) -> String {
            self.dir.path().join(name).display().to_string()
        }

        fn session(&self, lines: &[&str]) -> InteractiveSession<Cursor<Vec<u8>>, Vec<u8>> {
            let mut text = lines.join("\n");
            text.push('\n');
            InteractiveSession::new(Cursor::new(text.into_bytes()), Vec::new())
        }
    }

    fn transcript(session: InteractiveSession<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(session.into_parts().1).unwrap()
    }

    fn kind(err: WatermarkError) -> Option<ErrorKind> {
        err.as_validation().map(ValidationError::kind)
    }

    #[test]
    fn test_single_placement_session() {
        let fx = Fixture::new();
        let out = fx.path("out.png");
        let mut session = fx.session(&[
            &fx.path("base.png"),
            &fx.path("mark.png"),
            "no",
            "50",
            "single",
            "2 2",
            &out,
        ]);

        let compositor = Compositor::with_options(CompositeOptions::new().with_parallel(false));
        session.run(&compositor, 90).unwrap();

        let image = image::open(&out).unwrap().into_rgb8();
        assert_eq!(*image.get_pixel(0, 0), Rgb([200, 200, 200]));
        assert_eq!(*image.get_pixel(3, 3), Rgb([227, 227, 227]));

        let text = transcript(session);
        assert!(text.contains("Do you want to set a transparency color?"));
        assert!(!text.contains("Alpha channel"));
        assert!(text.contains("Input the watermark position ([x 0-2] [y 0-2]):"));
        assert!(text.ends_with(&format!("The watermarked image {} has been created.\n", out)));
    }

    #[test]
    fn test_transparency_color_question() {
        let fx = Fixture::new();
        let mut session = fx.session(&[
            &fx.path("base.png"),
            &fx.path("mark.png"),
            "yes",
            "255 255 255",
            "100",
            "grid",
            &fx.path("out.jpg"),
        ]);

        let job = session.collect().unwrap();
        assert_eq!(job.config().transparency_color, Some(Color::WHITE));
        assert_eq!(job.config().placement, Placement::Grid);
        assert!(!job.config().use_alpha);
    }

    #[test]
    fn test_alpha_question_only_for_alpha_watermark() {
        let fx = Fixture::new();
        let mut session = fx.session(&[
            &fx.path("base.png"),
            &fx.path("alpha.png"),
            "yes",
            "100",
            "grid",
            &fx.path("out.png"),
        ]);

        let job = session.collect().unwrap();
        assert!(job.config().use_alpha);
        assert_eq!(job.config().transparency_color, None);

        let text = transcript(session);
        assert!(text.contains("Do you want to use the watermark's Alpha channel?"));
        assert!(!text.contains("transparency color?"));
    }

    #[test]
    fn test_stops_at_first_invalid_answer() {
        let fx = Fixture::new();
        let out = fx.path("out.png");
        let mut session = fx.session(&[
            &fx.path("base.png"),
            &fx.path("mark.png"),
            "no",
            "150",
            "grid",
            &out,
        ]);

        let err = session.run(&Compositor::new(), 90).unwrap_err();
        assert_eq!(err.to_string(), "The transparency percentage is out of range.");
        assert!(!std::path::Path::new(&out).exists());
        assert!(!transcript(session).contains("position method"));
    }

    #[test]
    fn test_missing_file() {
        let fx = Fixture::new();
        let mut session = fx.session(&[&fx.path("missing.png")]);
        assert_eq!(kind(session.collect().unwrap_err()), Some(ErrorKind::FileNotFound));
    }

    #[test]
    fn test_watermark_larger_than_image() {
        let fx = Fixture::new();
        let mut session = fx.session(&[&fx.path("mark.png"), &fx.path("base.png")]);
        assert_eq!(
            kind(session.collect().unwrap_err()),
            Some(ErrorKind::DimensionTooLarge)
        );
    }

    #[test]
    fn test_invalid_method_and_extension() {
        let fx = Fixture::new();
        let mut session =
            fx.session(&[&fx.path("base.png"), &fx.path("mark.png"), "no", "5", "tile"]);
        assert_eq!(
            kind(session.collect().unwrap_err()),
            Some(ErrorKind::InvalidPlacementMethod)
        );

        let mut session = fx.session(&[
            &fx.path("base.png"),
            &fx.path("mark.png"),
            "no",
            "5",
            "grid",
            "out.gif",
        ]);
        assert_eq!(
            kind(session.collect().unwrap_err()),
            Some(ErrorKind::InvalidOutputExtension)
        );
    }

    #[test]
    fn test_position_out_of_range() {
        let fx = Fixture::new();
        let mut session = fx.session(&[
            &fx.path("base.png"),
            &fx.path("mark.png"),
            "no",
            "5",
            "single",
            "3 0",
        ]);
        assert_eq!(kind(session.collect().unwrap_err()), Some(ErrorKind::OutOfRange));
    }

    #[test]
    fn test_end_of_input() {
        let fx = Fixture::new();
        let mut session = fx.session(&[&fx.path("base.png")]);
        let err = session.collect().unwrap_err();
        assert!(matches!(
            err,
            WatermarkError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof
        ));
    }
}
