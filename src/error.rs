use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    #[error("a palette needs at least 2 colors, got {0}")]
    TooFewColors(usize),
    #[error("color {0} has a component out of bounds (must be between 0 and 1)")]
    OutOfBounds(usize),
    #[error("unknown palette '{0}' (expected 'viridis' or 'blue_red')")]
    UnknownName(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("range minimum {min} is not below maximum {max}")]
    Inverted { min: f64, max: f64 },
    #[error("range bounds and their span must be finite")]
    NonFinite,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("invalid palette, {0}")]
    Palette(#[from] PaletteError),
    #[error("invalid range, {0}")]
    Range(#[from] RangeError),
    #[error("input value {0} is not a number")]
    NotANumber(usize),
    #[error("{binning} binning needs at least {needed} palette colors, got {len}")]
    BinningTooFewColors {
        binning: &'static str,
        needed: usize,
        len: usize,
    },
    #[error("unknown binning '{0}' (expected 'uniform' or 'legacy')")]
    UnknownBinning(String),
}

#[derive(Error, Debug)]
pub enum ColormapError {
    #[error("could not parse JSON file\n{0}")]
    JsonError(#[from] serde_json::Error),
    #[error("could not parse RON file\n{0}")]
    RonError(#[from] ron::error::SpannedError),
    #[error("could not write RON file\n{0}")]
    RonWriteError(#[from] ron::Error),
    #[error("could not parse YAML file\n{0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("failed to access file\n{0}")]
    IoError(#[from] std::io::Error),
    #[error("file does not have a valid extension (must be .json, .ron or .yaml)")]
    ExtensionError,
    #[error("failed to save image\n{0}")]
    ImageSaveError(#[from] image::ImageError),
    #[error("line {line}: '{token}' is not a number")]
    ValueParseError { line: usize, token: String },
    #[error("{0}")]
    MapError(#[from] MapError),
    #[error("invalid color palette, {0}")]
    PaletteError(#[from] PaletteError),
    #[error("invalid value range, {0}")]
    RangeError(#[from] RangeError),
}
