//! Driver capability detection.
//!
//! Desktop drivers disagree on which shading-language dialect they accept:
//! anything reporting OpenGL 3.x or newer takes GLSL 330 core with explicit
//! attribute locations, while older profiles only accept GLSL 120. The
//! probe classifies the reported `GL_VERSION` string once per context; the
//! result is passed down to everything that compiles shaders and must not
//! be re-derived mid-context.

use glow::HasContext;

/// The shading-language dialect a context accepts.
///
/// Derived once per context from the driver's version string and immutable
/// for that context's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslTier {
    /// GLSL 120: `attribute` inputs, `gl_FragColor`, attribute locations
    /// bound before linking.
    Legacy,
    /// GLSL 330 core: `layout(location = N)` inputs and explicit fragment
    /// outputs.
    Modern,
}

impl GlslTier {
    /// Classify a `GL_VERSION` string.
    ///
    /// Scans for the first whitespace-separated token containing a
    /// `MAJOR.MINOR` version and applies the policy: major version ≥ 3
    /// selects [`Modern`](Self::Modern). Any parse failure, or a string
    /// with no version token at all, resolves to
    /// [`Legacy`](Self::Legacy) — the more restrictive dialect is always
    /// safe to fall back to.
    #[must_use]
    pub fn classify(version: &str) -> Self {
        for token in version.split_whitespace() {
            let Some((major, _)) = token.split_once('.') else {
                continue;
            };
            if let Ok(major) = major.parse::<u32>() {
                return if major >= 3 { Self::Modern } else { Self::Legacy };
            }
        }
        Self::Legacy
    }

    /// Query the active context's version string and classify it.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    #[must_use]
    pub unsafe fn detect(gl: &glow::Context) -> Self {
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        let tier = Self::classify(&version);
        log::debug!("driver reports {version:?}, selected {tier:?} dialect");
        tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_desktop_strings() {
        assert_eq!(
            GlslTier::classify("4.6 (Core Profile) Mesa 23.1.4"),
            GlslTier::Modern
        );
        assert_eq!(GlslTier::classify("3.3.0 NVIDIA 535.86.05"), GlslTier::Modern);
    }

    #[test]
    fn legacy_strings() {
        assert_eq!(
            GlslTier::classify("2.1 Metal - 76.3"),
            GlslTier::Legacy
        );
        assert_eq!(GlslTier::classify("1.4 (2.1 Mesa)"), GlslTier::Legacy);
    }

    #[test]
    fn prefix_tokens_are_skipped() {
        // The version number is not always the first token.
        assert_eq!(GlslTier::classify("OpenGL ES 3.2 v1.r38p1"), GlslTier::Modern);
    }

    #[test]
    fn unparseable_input_falls_back_to_legacy() {
        assert_eq!(GlslTier::classify(""), GlslTier::Legacy);
        assert_eq!(GlslTier::classify("no version here"), GlslTier::Legacy);
        assert_eq!(GlslTier::classify("x.y garbage"), GlslTier::Legacy);
    }

    #[test]
    fn classification_is_stable() {
        let s = "4.1 ATI-4.14.1";
        assert_eq!(GlslTier::classify(s), GlslTier::classify(s));
    }
}
