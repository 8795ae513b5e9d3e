//! The closed set of source languages the analysis service understands.
//!
//! Each language carries a wire identifier, the file extensions it claims,
//! and a fixed seed snippet used to populate a fresh session.

/// A source language the remote analyzer can process.
///
/// The set is closed: language selection happens against this enum, so an
/// unknown identifier is rejected at the boundary and never reaches a
/// session or the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    C,
    Swift,
    Java,
}

/// Every selectable language, in selector order.
pub const ALL_LANGUAGES: &[SourceLanguage] =
    &[SourceLanguage::C, SourceLanguage::Swift, SourceLanguage::Java];

const SAMPLE_C: &str = r#"int a = 0;
int b = 10;
do {
    a = 3 * b;
}
while (x == 2);"#;

const SAMPLE_SWIFT: &str = r#"let playerName: String = "Kratos"
var playerLevel: Int = 1
playerLevel = 2

playerName = "Ghost of Sparta""#;

const SAMPLE_JAVA: &str = r#"int score = 100;
String title = "Champion";
if (score > 50) {
    System.out.println(title);
}"#;

impl SourceLanguage {
    /// The identifier sent on the wire in the `language` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::C => "c",
            SourceLanguage::Swift => "swift",
            SourceLanguage::Java => "java",
        }
    }

    /// Resolve a language identifier. Returns `None` for anything outside
    /// the closed set; callers must reject before mutating any state.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "c" => Some(SourceLanguage::C),
            "swift" => Some(SourceLanguage::Swift),
            "java" => Some(SourceLanguage::Java),
            _ => None,
        }
    }

    /// Determine the language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "c" | "h" => Some(SourceLanguage::C),
            "swift" => Some(SourceLanguage::Swift),
            "java" => Some(SourceLanguage::Java),
            _ => None,
        }
    }

    /// File extensions associated with this language.
    pub fn extensions(&self) -> &[&'static str] {
        match self {
            SourceLanguage::C => &["c", "h"],
            SourceLanguage::Swift => &["swift"],
            SourceLanguage::Java => &["java"],
        }
    }

    /// The fixed seed snippet for this language.
    ///
    /// Total over the enum and always non-empty; a fresh session starts
    /// from this text, and a language change replaces the editor content
    /// with it.
    pub fn sample(&self) -> &'static str {
        match self {
            SourceLanguage::C => SAMPLE_C,
            SourceLanguage::Swift => SAMPLE_SWIFT,
            SourceLanguage::Java => SAMPLE_JAVA,
        }
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
