//! Line based static analysis of shader sources and materials.

/// Pragma directives declaring sets of keywords which multiply shader variants.
const KEYWORD_DIRECTIVES: [&str; 4] = [
    "multi_compile",
    "multi_compile_local",
    "shader_feature",
    "shader_feature_local",
];

/// Keyword standing for "none of the keywords of this set".
pub const NO_KEYWORD: &str = "_";

/// A set of keywords declared by a single pragma directive.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
pub struct KeywordSet {
    /// The declaring directive, e.g. `multi_compile`.
    pub directive: String,
    /// Declared keywords, [`NO_KEYWORD`] included.
    pub keywords: Vec<String>,
}

impl KeywordSet {
    /// Number of variants this set yields.
    ///
    /// A `shader_feature` with a single keyword implicitly adds the "no keyword" variant.
    #[inline]
    #[must_use]
    pub fn variants(&self) -> u64 {
        let declared = u64::try_from(self.keywords.len()).unwrap_or(u64::MAX);
        if declared == 1 && self.directive.starts_with("shader_feature") {
            2
        } else {
            declared.max(1)
        }
    }
}

/// Accumulated results of analysing a source, line by line.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub struct SourceAnalysis {
    /// Number of scanned lines.
    pub line_count: usize,
    /// Number of `Pass` blocks of a shader.
    pub passes: usize,
    /// Vertex and fragment entry points.
    pub entry_points: Vec<String>,
    /// Compute kernels.
    pub kernels: Vec<String>,
    /// Keyword sets multiplying the variants.
    pub keyword_sets: Vec<KeywordSet>,
    /// Keywords enabled by a material.
    pub material_keywords: Vec<String>,
    /// Number of texture slots of a material.
    pub texture_slots: usize,
}

impl SourceAnalysis {
    /// Accounts for one more line of the source.
    #[inline]
    pub fn scan_line(&mut self, line: &str) {
        self.line_count = self.line_count.saturating_add(1);
        let trimmed = line.trim();

        if let Some(pragma) = trimmed.strip_prefix("#pragma") {
            self.scan_pragma(pragma);
        } else if is_pass_block(trimmed) {
            self.passes = self.passes.saturating_add(1);
        } else if let Some(keywords) = trimmed.strip_prefix("m_ShaderKeywords:") {
            self.material_keywords
                .extend(keywords.split_whitespace().map(str::to_owned));
        } else if trimmed.starts_with("m_Texture:") {
            self.texture_slots = self.texture_slots.saturating_add(1);
        }
    }

    /// Total number of shader variants, the product of the variants of all keyword sets.
    #[inline]
    #[must_use]
    pub fn variant_count(&self) -> u64 {
        self.keyword_sets
            .iter()
            .fold(1, |count, set| count.saturating_mul(set.variants()))
    }

    fn scan_pragma(&mut self, pragma: &str) {
        let mut words = pragma.split_whitespace();
        let Some(directive) = words.next() else {
            return;
        };
        match directive {
            "vertex" | "fragment" => self.entry_points.extend(words.next().map(str::to_owned)),
            "kernel" => self.kernels.extend(words.next().map(str::to_owned)),
            _ if KEYWORD_DIRECTIVES.contains(&directive) => {
                let keywords = words.map(str::to_owned).collect::<Vec<_>>();
                if keywords.is_empty() {
                    log::trace!("ignoring `{directive}` without keywords");
                    return;
                }
                self.keyword_sets.push(KeywordSet {
                    directive: directive.to_owned(),
                    keywords,
                });
            }
            _ => log::trace!("ignoring `#pragma {directive}`"),
        }
    }
}

/// Returns whether the trimmed line opens a `Pass` block.
fn is_pass_block(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("Pass")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '{', '\t']))
}

#[cfg(test)]
mod test {
    use super::*;

    fn analyse(source: &str) -> SourceAnalysis {
        let mut analysis = SourceAnalysis::default();
        source.lines().for_each(|line| analysis.scan_line(line));
        analysis
    }

    #[test_log::test]
    fn shader_passes_and_entry_points() {
        let analysis = analyse(
            r#"Shader "Custom/Lit" {
                SubShader {
                    Pass {
                        HLSLPROGRAM
                        #pragma vertex Vert
                        #pragma fragment Frag
                        ENDHLSL
                    }
                    Pass
                    {
                    }
                    PassThrough = 1
                }
            }"#,
        );
        assert_eq!(analysis.line_count, 14);
        assert_eq!(analysis.passes, 2);
        assert_eq!(analysis.entry_points, ["Vert", "Frag"]);
        assert!(analysis.kernels.is_empty());
    }

    #[test_log::test]
    fn compute_kernels() {
        let analysis = analyse(
            "#pragma kernel BlurH\n#pragma kernel BlurV\n[numthreads(8,8,1)]\nvoid BlurH() {}",
        );
        assert_eq!(analysis.kernels, ["BlurH", "BlurV"]);
        assert_eq!(analysis.variant_count(), 1);
    }

    #[test_log::test]
    fn variants_multiply_across_keyword_sets() {
        let analysis = analyse(
            [
                "#pragma multi_compile _ FOG_LINEAR FOG_EXP",
                "#pragma multi_compile_local LOW MEDIUM HIGH",
                "#pragma shader_feature _NORMALMAP",
                "#pragma shader_feature_local _ _EMISSION",
                "#pragma multi_compile",
                "#pragma target 4.5",
            ]
            .join("\n")
            .as_str(),
        );
        assert_eq!(analysis.keyword_sets.len(), 4);
        assert_eq!(analysis.keyword_sets[2].variants(), 2);
        assert_eq!(analysis.variant_count(), 3 * 3 * 2 * 2);
    }

    #[test_log::test]
    fn material_keywords_and_textures() {
        let analysis = analyse(
            [
                "Material:",
                "  m_Name: Rock",
                "  m_ShaderKeywords: _NORMALMAP _EMISSION",
                "  m_SavedProperties:",
                "    m_TexEnvs:",
                "    - _MainTex:",
                "        m_Texture: {fileID: 0}",
                "    - _BumpMap:",
                "        m_Texture: {fileID: 2800000}",
            ]
            .join("\n")
            .as_str(),
        );
        assert_eq!(analysis.material_keywords, ["_NORMALMAP", "_EMISSION"]);
        assert_eq!(analysis.texture_slots, 2);
        assert_eq!(analysis.passes, 0);
    }

    #[test_log::test]
    fn no_keyword_is_a_variant_of_its_own() {
        let set = KeywordSet {
            directive: "multi_compile".to_owned(),
            keywords: vec![NO_KEYWORD.to_owned(), "FOG".to_owned()],
        };
        assert_eq!(set.variants(), 2);
    }
}
