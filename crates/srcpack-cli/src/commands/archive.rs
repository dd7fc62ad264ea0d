//! Archive command implementation.

use crate::cli::ArchiveArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use srcpack_core::ArchiveConfig;
use srcpack_core::ArchivingEngine;
use srcpack_core::FilterPolicy;
use srcpack_core::PatternFilter;
use std::fs;
use std::path::Path;

pub fn execute(args: &ArchiveArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "Output file '{}' already exists\n\
             HINT: Use --force to overwrite it.",
            args.output.display()
        );
    }

    let policy = add_archive_context(build_policy(args), &args.source)?;
    let config = ArchiveConfig::default()
        .with_compression_level(args.compression_level)
        .with_deduplicate(args.dedup)
        .with_prune_directories(!args.no_prune);
    let engine = ArchivingEngine::new(policy, config);
    let extra = args.extra_file.as_deref();

    let result = if !quiet && CliProgress::should_show() {
        let mut progress = CliProgress::new("Archiving");
        engine.archive_with_progress(&args.source, &args.output, extra, &mut progress)
    } else {
        engine.archive(&args.source, &args.output, extra)
    };
    let result = add_archive_context(result, &args.source)?;

    if result.is_empty() && !args.allow_empty {
        fs::remove_file(&args.output)
            .with_context(|| format!("failed to remove empty archive '{}'", args.output.display()))?;
        bail!(
            "Nothing to archive: no file under '{}' matched the filters\n\
             HINT: Check --include/--exclude, or use --allow-empty to keep an empty archive.",
            args.source.display()
        );
    }

    formatter.format_archive_result(&args.output, &result)
}

/// Builds the filter policy from the command-line specs.
///
/// With `--manifests`, the include/exclude specs become the required
/// dependency filter and the manifests the alternative.
fn build_policy(args: &ArchiveArgs) -> srcpack_core::Result<FilterPolicy> {
    let filter = PatternFilter::new(&args.include.join(","), &args.exclude.join(","));

    match &args.manifests {
        Some(manifests) => {
            let fingerprint = args
                .extra_file
                .as_deref()
                .and_then(Path::file_name)
                .and_then(|name| name.to_str());
            FilterPolicy::manifest_only(filter, PatternFilter::new(manifests, ""), fingerprint)
        }
        None => Ok(FilterPolicy::single(filter)),
    }
}
