//! Assets which reports can be built for.

use std::{
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

/// Extension of shader source files.
pub const SHADER_EXTENSION: &str = "shader";
/// Extension of compute shader source files.
pub const COMPUTE_SHADER_EXTENSION: &str = "compute";
/// Extension of material files.
pub const MATERIAL_EXTENSION: &str = "mat";

/// A shader source asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct ShaderAsset {
    /// Path to the shader source file.
    pub path: PathBuf,
}

/// A compute shader source asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct ComputeShaderAsset {
    /// Path to the compute shader source file.
    pub path: PathBuf,
}

/// A material asset, referencing some shader and its enabled keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct MaterialAsset {
    /// Path to the material file.
    pub path: PathBuf,
}

/// Any asset a report can be built for.
///
/// The set of asset kinds is closed, every report job factory
/// knows how to handle each of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "the set of asset kinds is closed")]
pub enum Asset {
    /// A shader.
    Shader(ShaderAsset),
    /// A compute shader.
    ComputeShader(ComputeShaderAsset),
    /// A material.
    Material(MaterialAsset),
}

impl Asset {
    /// Creates a shader asset from the given path.
    #[inline]
    #[must_use]
    pub fn shader(path: impl Into<PathBuf>) -> Self {
        Self::Shader(ShaderAsset { path: path.into() })
    }

    /// Creates a compute shader asset from the given path.
    #[inline]
    #[must_use]
    pub fn compute_shader(path: impl Into<PathBuf>) -> Self {
        Self::ComputeShader(ComputeShaderAsset { path: path.into() })
    }

    /// Creates a material asset from the given path.
    #[inline]
    #[must_use]
    pub fn material(path: impl Into<PathBuf>) -> Self {
        Self::Material(MaterialAsset { path: path.into() })
    }

    /// Classifies the file at the given path by its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not one of
    /// [`SHADER_EXTENSION`], [`COMPUTE_SHADER_EXTENSION`] or [`MATERIAL_EXTENSION`].
    #[inline]
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, InvalidAssetError> {
        let path = path.into();
        match path.extension().and_then(OsStr::to_str) {
            Some(SHADER_EXTENSION) => Ok(Self::shader(path)),
            Some(COMPUTE_SHADER_EXTENSION) => Ok(Self::compute_shader(path)),
            Some(MATERIAL_EXTENSION) => Ok(Self::material(path)),
            _ => Err(InvalidAssetError { path }),
        }
    }

    /// Returns the path of the asset.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Shader(ShaderAsset { path })
            | Self::ComputeShader(ComputeShaderAsset { path })
            | Self::Material(MaterialAsset { path }) => path,
        }
    }

    /// Returns a short human readable name of the asset kind.
    #[inline]
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Shader(_) => "shader",
            Self::ComputeShader(_) => "compute shader",
            Self::Material(_) => "material",
        }
    }
}

impl fmt::Display for Asset {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind_name(), self.path().display())
    }
}

impl TryFrom<PathBuf> for Asset {
    type Error = InvalidAssetError;

    #[inline]
    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        Self::from_path(path)
    }
}

impl TryFrom<&Path> for Asset {
    type Error = InvalidAssetError;

    #[inline]
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        Self::from_path(path)
    }
}

/// An error indicating that the given file is neither a shader,
/// a compute shader nor a material.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid asset '{}': expected a `.shader`, `.compute` or `.mat` file", .path.display())]
#[non_exhaustive]
pub struct InvalidAssetError {
    /// Path to the rejected file.
    pub path: PathBuf,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn classifies_by_extension() {
        assert_eq!(
            Asset::from_path("Lit.shader").unwrap(),
            Asset::shader("Lit.shader")
        );
        assert_eq!(
            Asset::from_path("dir/Blur.compute").unwrap(),
            Asset::compute_shader("dir/Blur.compute")
        );
        assert_eq!(
            Asset::from_path("Rock.mat").unwrap(),
            Asset::material("Rock.mat")
        );
    }

    #[test_log::test]
    fn rejects_unknown_extensions() {
        let err = Asset::from_path("albedo.png").unwrap_err();
        assert_eq!(err.path, Path::new("albedo.png"));
        assert!(Asset::from_path("Makefile").is_err());
        // extensions are case sensitive, like the asset database
        assert!(Asset::from_path("Lit.SHADER").is_err());
    }

    #[test_log::test]
    fn display_names_kind_and_path() {
        let asset = Asset::compute_shader("Blur.compute");
        assert_eq!(asset.to_string(), "compute shader 'Blur.compute'");
        assert_eq!(asset.path(), Path::new("Blur.compute"));
    }
}
