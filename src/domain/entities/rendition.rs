use std::fmt;

use serde::Serialize;

// ───── Transformation Parameters ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    Fill,
    Scale,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    Auto,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Mp4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Auto,
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CropMode::Fill => "fill",
            CropMode::Scale => "scale",
            CropMode::Limit => "limit",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gravity::Auto => "auto",
            Gravity::Center => "center",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Png => "png",
            OutputFormat::Mp4 => "mp4",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Auto => write!(f, "auto"),
        }
    }
}

// ───── Presets ──────────────────────────────────────────────────────

/// A named, statically known derived variant requested at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenditionSpec {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub crop: CropMode,
    pub gravity: Gravity,
    pub format: OutputFormat,
    pub quality: Quality,
}

impl RenditionSpec {
    const fn social(name: &'static str, width: u32, height: u32) -> Self {
        RenditionSpec {
            name,
            width,
            height,
            crop: CropMode::Fill,
            gravity: Gravity::Auto,
            format: OutputFormat::Png,
            quality: Quality::Auto,
        }
    }

    /// Transformation descriptor sent to the store, e.g.
    /// `c_fill,f_png,g_auto,h_1080,q_auto,w_1080`.
    ///
    /// Parameters are emitted in alphabetical order, which is also the
    /// order the store echoes them back in.
    pub fn transformation(&self) -> String {
        format!(
            "c_{},f_{},g_{},h_{},q_{},w_{}",
            self.crop, self.format, self.gravity, self.height, self.quality, self.width
        )
    }
}

static SOCIAL_PRESETS: [RenditionSpec; 20] = [
    RenditionSpec::social("instagram_square", 1080, 1080),
    RenditionSpec::social("instagram_portrait", 1080, 1350),
    RenditionSpec::social("instagram_story", 1080, 1920),
    RenditionSpec::social("facebook_post", 1200, 630),
    RenditionSpec::social("facebook_cover", 820, 312),
    RenditionSpec::social("facebook_story", 1080, 1920),
    RenditionSpec::social("twitter_post", 1200, 675),
    RenditionSpec::social("twitter_header", 1500, 500),
    RenditionSpec::social("linkedin_post", 1200, 627),
    RenditionSpec::social("linkedin_banner", 1584, 396),
    RenditionSpec::social("youtube_thumbnail", 1280, 720),
    RenditionSpec::social("youtube_channel_banner", 2560, 1440),
    RenditionSpec::social("pinterest_pin", 1000, 1500),
    RenditionSpec::social("snapchat_story", 1080, 1920),
    RenditionSpec::social("tiktok_video_cover", 1080, 1920),
    RenditionSpec::social("threads_post", 1080, 1350),
    RenditionSpec::social("reddit_banner", 1920, 384),
    RenditionSpec::social("tumblr_graphic", 1280, 720),
    RenditionSpec::social("whatsapp_status", 1080, 1920),
    RenditionSpec::social("medium_post_image", 1200, 900),
];

static VIDEO_PRESET: RenditionSpec = RenditionSpec {
    name: "compressed_720p",
    width: 1280,
    height: 720,
    crop: CropMode::Limit,
    gravity: Gravity::Center,
    format: OutputFormat::Mp4,
    quality: Quality::Auto,
};

/// Social-media image presets, in request order.
pub fn social_presets() -> &'static [RenditionSpec] {
    &SOCIAL_PRESETS
}

pub fn find_preset(name: &str) -> Option<&'static RenditionSpec> {
    SOCIAL_PRESETS
        .iter()
        .chain(std::iter::once(&VIDEO_PRESET))
        .find(|p| p.name == name)
}

/// The single bandwidth-capped rescale requested for every video.
pub fn video_preset() -> &'static RenditionSpec {
    &VIDEO_PRESET
}
