use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::catalog::{Catalog, PreTranslatedIndex};
use crate::error::{MsglocError, Result};
use crate::markup::{is_passthrough, reassemble, tokenize};
use crate::translate::common::check_distinct_locales;
use crate::translate::{TranslationCapability, translate_segment};

/// What happened to one target locale of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleReport {
    pub locale: String,
    pub output_path: PathBuf,
    /// Messages copied from a pre-translated catalog
    pub reused: usize,
    /// Messages run through the translator
    pub translated: usize,
    /// Empty or whitespace-only segments kept as-is
    pub passthrough_segments: usize,
    /// Segments actually sent to the translator
    pub translated_segments: usize,
}

/// Translates source catalogs into target locales, one output catalog per locale
pub struct Workflow {
    translator: Box<dyn TranslationCapability>,
    pre_translated: PreTranslatedIndex,
}

impl Workflow {
    pub fn new(translator: Box<dyn TranslationCapability>, pre_translated: PreTranslatedIndex) -> Self {
        Self {
            translator,
            pre_translated,
        }
    }

    /// Load a catalog file and translate it into every target locale
    pub async fn process_file<P: AsRef<Path>>(
        &self,
        source_path: P,
        target_locales: &[String],
    ) -> Result<Vec<LocaleReport>> {
        let source = Catalog::load(source_path)?;
        self.translate_catalog(&source, target_locales).await
    }

    /// Translate a catalog into each target locale in turn.
    ///
    /// Each locale is written as soon as it is assembled. A failure stops the remaining
    /// locales, but catalogs already written stay on disk.
    pub async fn translate_catalog(
        &self,
        source: &Catalog,
        target_locales: &[String],
    ) -> Result<Vec<LocaleReport>> {
        for target in target_locales {
            check_distinct_locales(source.locale(), target)?;
        }

        info!(
            "Translating {} ({} messages, {}) into {} using {}",
            display_path(source.path()),
            source.len(),
            source.locale(),
            target_locales.join(", "),
            self.translator.name()
        );

        let mut reports = Vec::with_capacity(target_locales.len());
        for target in target_locales {
            let (catalog, report) = match self.translate_locale(source, target).await {
                Ok(done) => done,
                Err(e) => {
                    error!("Translation of {} into {} failed: {}", display_path(source.path()), target, e);
                    return Err(e);
                }
            };

            catalog.write()?;

            info!(
                "{}: {} translated, {} reused, {} segments sent -> {}",
                report.locale,
                report.translated,
                report.reused,
                report.translated_segments,
                display_path(&report.output_path)
            );
            reports.push(report);
        }

        Ok(reports)
    }

    /// Build the catalog for one target locale without writing it
    pub async fn translate_locale(&self, source: &Catalog, target: &str) -> Result<(Catalog, LocaleReport)> {
        let src = source.locale();
        check_distinct_locales(src, target)?;

        let needs_translation = source
            .messages()
            .keys()
            .any(|key| self.pre_translated.lookup(target, key).is_none());
        if needs_translation && !self.translator.is_supported(src, target).await? {
            return Err(MsglocError::UnsupportedLocalePair {
                backend: self.translator.name().to_string(),
                src: src.to_string(),
                dst: target.to_string(),
            });
        }

        let mut output = source.with_locale(target);
        let mut pass = LocalePass::new(self.translator.as_ref(), src, target);
        pass.report.output_path = output.path().to_path_buf();

        for (key, message) in source.messages() {
            let text = match self.pre_translated.lookup(target, key) {
                Some(known) => {
                    debug!("[{}] {}: reused", target, key);
                    pass.report.reused += 1;
                    known.to_string()
                }
                None => {
                    let translated = pass.translate_message(&message.message).await.inspect_err(|e| {
                        error!("[{}] {}: {}", target, key, e);
                    })?;
                    debug!("[{}] {}: {:?} -> {:?}", target, key, message.message, translated);
                    pass.report.translated += 1;
                    translated
                }
            };
            output.set_text(key, text);
        }

        Ok((output, pass.report))
    }
}

/// Translate a single message, leaving its markup untouched
pub async fn translate_message(
    translator: &dyn TranslationCapability,
    message: &str,
    src_locale: &str,
    dst_locale: &str,
) -> Result<String> {
    LocalePass::new(translator, src_locale, dst_locale)
        .translate_message(message)
        .await
}

/// Per-locale state: segment memo and counters, owned by the pass for that locale
struct LocalePass<'a> {
    translator: &'a dyn TranslationCapability,
    src: &'a str,
    dst: &'a str,
    memo: HashMap<String, String>,
    report: LocaleReport,
}

impl<'a> LocalePass<'a> {
    fn new(translator: &'a dyn TranslationCapability, src: &'a str, dst: &'a str) -> Self {
        Self {
            translator,
            src,
            dst,
            memo: HashMap::new(),
            report: LocaleReport {
                locale: dst.to_string(),
                ..LocaleReport::default()
            },
        }
    }

    async fn translate_message(&mut self, message: &str) -> Result<String> {
        let pieces = tokenize(message);
        let mut translated = Vec::with_capacity(pieces.segments.len());

        for segment in &pieces.segments {
            if is_passthrough(segment) {
                self.report.passthrough_segments += 1;
                translated.push(segment.to_string());
                continue;
            }
            if let Some(known) = self.memo.get(*segment) {
                translated.push(known.clone());
                continue;
            }

            let result = translate_segment(self.translator, segment, self.src, self.dst).await?;
            self.report.translated_segments += 1;
            self.memo.insert(segment.to_string(), result.clone());
            translated.push(result);
        }

        Ok(reassemble(&translated, &pieces.tokens, pieces.leading))
    }
}

/// Path relative to the working directory when possible
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
