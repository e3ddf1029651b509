use crate::header::ShapeKind;

/// All errors that can happen when reading a Shapefile dataset.
///
/// Each variant carries the numeric code of the source format's error
/// taxonomy so callers that need wire compatibility with it can match on
/// [`Error::code`] instead of the variant itself.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required input stream (.shp/.shx/.dbf) could not be found.
    #[error("required input file not found: {0}")]
    FileNotFound(String),

    /// A required input stream is present but could not be opened/read.
    #[error("I/O error")]
    FileOpen(#[from] std::io::Error),

    /// The header declared a shape kind outside the thirteen supported tags.
    #[error("unsupported shape kind code `{0}`")]
    UnsupportedShapeKind(i32),

    /// A record's embedded shape kind is neither 0 (null) nor the file's
    /// declared kind.
    #[error("record declares shape kind `{actual}`, file declares `{declared}`")]
    WrongRecordKind { declared: ShapeKind, actual: i32 },

    /// Signed-area scale escalation reached 10^9 and the area was still zero.
    #[error("polygon ring area too small to determine orientation")]
    PolygonAreaTooSmall,

    /// A polygon part's first ring is not clockwise.
    #[error("polygon part does not start with a clockwise ring")]
    InvalidPolygon,

    /// DBF header is missing its terminator byte or is otherwise malformed.
    #[error("malformed DBF header: {0}")]
    DbfInvalid(&'static str),

    /// DBF record count does not match the SHX-implied record count.
    #[error("DBF record count `{dbf}` does not match SHX record count `{shx}`")]
    DbfMismatched { dbf: u32, shx: u32 },

    /// Attempted to read a DBF row past the last record.
    #[error("attempted to read past the last DBF record")]
    DbfEofReached,

    /// `seek` to an ordinal outside `[1, tot_records]`.
    #[error("ordinal `{0}` is out of range")]
    IndexOutOfRange(i64),
}

impl Error {
    /// Stable numeric code matching the source format's error taxonomy.
    pub fn code(&self) -> u32 {
        match self {
            Error::FileNotFound(_) => 11,
            Error::FileOpen(_) => 12,
            Error::UnsupportedShapeKind(_) => 21,
            Error::WrongRecordKind { .. } => 22,
            Error::PolygonAreaTooSmall => 31,
            Error::InvalidPolygon => 32,
            Error::DbfInvalid(_) => 41,
            Error::DbfMismatched { .. } => 42,
            Error::DbfEofReached => 43,
            Error::IndexOutOfRange(_) => 91,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
