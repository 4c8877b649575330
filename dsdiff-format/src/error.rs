use crate::header::FourCc;
use crate::parse::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("not a DSDIFF stream")]
    NotDsdiff { found: Option<FourCc> },

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for DecodeError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Rejected(found) => DecodeError::NotDsdiff { found },
            ParseError::NeedMoreBytes(_) => {
                DecodeError::Io(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, e))
            }
        }
    }
}
