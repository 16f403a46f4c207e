mod text;
mod url;

pub use self::text::*;
pub use self::url::*;
