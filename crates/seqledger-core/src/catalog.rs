//! Static lookup tables for delivered result files.

/// Known result-file suffixes paired with their coarse category.
///
/// Ordered most-specific-first: compound suffixes come before their
/// prefixes ("vcf.gz.tbi" before "vcf.gz" before "vcf") so the first match
/// in catalog order is always the longest one.
pub const EXTENSION_CATALOG: &[(&str, &str)] = &[
    ("vcf.gz.tbi", "vcf"),
    ("vcf.gz", "vcf"),
    ("vcf", "vcf"),
    ("cram.crai", "cram"),
    ("cram", "cram"),
    ("bam.bai", "bam"),
    ("bam", "bam"),
    ("fastq.gz", "fastq"),
    ("fastq", "fastq"),
    ("cgh", "cgh"),
    ("html", "html"),
    ("pdf", "pdf"),
    ("json", "json"),
    ("cns", "cns"),
    ("gene_metrics", "gene_metrics"),
    ("doc", "doc"),
];

/// The four result files every patient is expected to deliver, in the
/// fixed order used for count arrays and reports.
pub const ESSENTIAL_PATTERNS: [&str; 4] = [
    "SV.germline",
    "SNV.germline",
    "SV.somatic",
    "SNV.somatic",
];

/// SHA-256 of zero bytes. A record carrying this hash together with a
/// "0 bytes" size-class is an empty delivery.
pub const EMPTY_FILE_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Resolve a file name against the catalog. Probes suffixes in catalog
/// order; the first (most specific) match wins. `None` means unknown type,
/// not an error.
pub fn match_extension(file_name: &str) -> Option<&'static str> {
    EXTENSION_CATALOG
        .iter()
        .map(|&(suffix, _)| suffix)
        .find(|suffix| file_name.ends_with(suffix))
}

/// Coarse category for a catalog suffix (e.g. both "cram" and "cram.crai"
/// map to "cram").
pub fn category_for(extension: &str) -> Option<&'static str> {
    EXTENSION_CATALOG
        .iter()
        .find(|&&(suffix, _)| suffix == extension)
        .map(|&(_, category)| category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_suffix_wins_over_prefix() {
        assert_eq!(match_extension("sample.vcf.gz.tbi"), Some("vcf.gz.tbi"));
        assert_eq!(match_extension("sample.vcf.gz"), Some("vcf.gz"));
        assert_eq!(match_extension("sample.vcf"), Some("vcf"));
        assert_eq!(match_extension("tumor.merged.cram.crai"), Some("cram.crai"));
    }

    #[test]
    fn test_unknown_suffix_is_none() {
        assert_eq!(match_extension("README.txt"), None);
        assert_eq!(match_extension("sample.tbi"), None);
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(category_for("vcf.gz.tbi"), Some("vcf"));
        assert_eq!(category_for("cram.crai"), Some("cram"));
        assert_eq!(category_for("bam.bai"), Some("bam"));
        assert_eq!(category_for("pdf"), Some("pdf"));
        assert_eq!(category_for("xyz"), None);
    }

    #[test]
    fn test_essential_pattern_order() {
        assert_eq!(
            ESSENTIAL_PATTERNS,
            ["SV.germline", "SNV.germline", "SV.somatic", "SNV.somatic"]
        );
    }
}
