use std::fmt;

pub const EXT_WINDOW_FEATURES: &str = "resizable,width=230,height=270";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BtnListMode {
    #[default]
    InPage,
    ExtWindow,
}

impl BtnListMode {
    pub fn parse(value: &str) -> Result<Self, ModeParseError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("in-page") || value.eq_ignore_ascii_case("inpage") {
            return Ok(BtnListMode::InPage);
        }
        if value.eq_ignore_ascii_case("window") || value.eq_ignore_ascii_case("ext-window") {
            return Ok(BtnListMode::ExtWindow);
        }
        Err(ModeParseError {
            value: value.to_string(),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BtnListMode::InPage => "in-page",
            BtnListMode::ExtWindow => "window",
        }
    }
}

impl fmt::Display for BtnListMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BtnListMode {
    type Err = ModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeParseError {
    pub value: String,
}

impl fmt::Display for ModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown button list mode '{}'", self.value)
    }
}

impl std::error::Error for ModeParseError {}
