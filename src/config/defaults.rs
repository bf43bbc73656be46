//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }

    pub fn email() -> String {
        "user@noreply.syndica".into()
    }

    pub fn language() -> String {
        "en-US".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub mod json_feed {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "feed.json".into()
        }
    }

    pub mod rss {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "rss.xml".into()
        }

        pub fn category_dir() -> PathBuf {
            "rss".into()
        }

        pub fn ttl() -> u32 {
            1440
        }
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
