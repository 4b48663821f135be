//! Diffs between two assets or two archives.
//!
//! Archives of named entries are compared with a sorted-name merge: both name
//! lists are walked in lexicographic order with one cursor each, so the
//! resulting rows interleave deletions, updates, and additions by name.

use std::collections::BTreeMap;

use tracing::trace;

use plandiff_types::{Archive, ArchiveEntry, ArchiveSource, Asset, AssetSource, StepOp};

use crate::error::RenderResult;
use crate::printer::{max_key, short_hash, text_change, Title};
use crate::renderer::Renderer;
use crate::text::diff_lines;
use crate::value::Blob;

/// One step of a sorted-name merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Merged<'a, V> {
    /// Present only in the old map.
    Deleted(&'a str, &'a V),
    /// Present only in the new map.
    Added(&'a str, &'a V),
    /// Present in both.
    Both(&'a str, &'a V, &'a V),
}

impl<V> Merged<'_, V> {
    pub fn name(&self) -> &str {
        match self {
            Merged::Deleted(name, _) | Merged::Added(name, _) | Merged::Both(name, _, _) => name,
        }
    }
}

/// Merge two name-keyed maps into one edit script ordered by name.
pub fn merge_by_name<'a, V>(
    old: &'a BTreeMap<String, V>,
    new: &'a BTreeMap<String, V>,
) -> Vec<Merged<'a, V>> {
    let old: Vec<(&String, &V)> = old.iter().collect();
    let new: Vec<(&String, &V)> = new.iter().collect();
    let mut steps = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);

    loop {
        match (old.get(i), new.get(j)) {
            (Some(&(o, ov)), Some(&(n, nv))) if o == n => {
                steps.push(Merged::Both(o.as_str(), ov, nv));
                i += 1;
                j += 1;
            }
            (Some(&(o, ov)), Some(&(n, _))) if o < n => {
                steps.push(Merged::Deleted(o.as_str(), ov));
                i += 1;
            }
            (Some(&(o, ov)), None) => {
                steps.push(Merged::Deleted(o.as_str(), ov));
                i += 1;
            }
            (_, Some(&(n, nv))) => {
                steps.push(Merged::Added(n.as_str(), nv));
                j += 1;
            }
            (None, None) => break,
        }
    }

    steps
}

/// Header for an unchanged asset: `asset(<kind>:<hash>) { <location> }`.
fn asset_header(asset: &Asset) -> String {
    let contents = match &asset.source {
        AssetSource::Text(_) => "...",
        AssetSource::Path(path) => path,
        AssetSource::Uri(uri) => uri,
    };
    format!("asset({}:{}) {{ {contents} }}\n", asset.kind(), short_hash(&asset.hash))
}

/// Header for an unchanged archive: `archive(<kind>:<hash>) { <location> }`.
fn archive_header(archive: &Archive) -> String {
    let contents = match &archive.source {
        ArchiveSource::Assets(_) => "...",
        ArchiveSource::Path(path) => path,
        ArchiveSource::Uri(uri) => uri,
    };
    format!("archive({}:{}) {{ {contents} }}\n", archive.kind(), short_hash(&archive.hash))
}

impl Renderer<'_> {
    pub(crate) fn print_archive_diff(
        &mut self,
        title: Title<'_>,
        old: &Archive,
        new: &Archive,
        level: usize,
    ) -> RenderResult<()> {
        if old.hash == new.hash {
            if !self.opts.summary {
                title.print(&mut self.out, StepOp::Same, false);
                self.out.write(StepOp::Same, &archive_header(old));
            }
            return Ok(());
        }

        let op = StepOp::Update;
        let hash_change = text_change(short_hash(&old.hash), short_hash(&new.hash));

        match (&old.source, &new.source) {
            (ArchiveSource::Path(old_path), ArchiveSource::Path(new_path)) => {
                title.print(&mut self.out, op, true);
                self.out.write(
                    op,
                    &format!(
                        "archive(file:{hash_change}) {{ {} }}\n",
                        text_change(old_path, new_path)
                    ),
                );
            }
            (ArchiveSource::Uri(old_uri), ArchiveSource::Uri(new_uri)) => {
                title.print(&mut self.out, op, true);
                self.out.write(
                    op,
                    &format!(
                        "archive(uri:{hash_change}) {{ {} }}\n",
                        text_change(old_uri, new_uri)
                    ),
                );
            }
            (ArchiveSource::Assets(old_entries), ArchiveSource::Assets(new_entries)) => {
                title.print(&mut self.out, op, true);
                self.out
                    .write(op, &format!("archive(assets:{hash_change}) {{\n"));
                self.descend(|r| r.print_entries_diff(old_entries, new_entries, level + 1))?;
                self.out.write_with_indent(level, op, false, "}\n");
            }
            // A file archive became a URI archive, and so on.
            _ => self.print_blob_replacement(title, Blob::Archive(old), Blob::Archive(new), level)?,
        }
        Ok(())
    }

    fn print_entries_diff(
        &mut self,
        old: &BTreeMap<String, ArchiveEntry>,
        new: &BTreeMap<String, ArchiveEntry>,
        level: usize,
    ) -> RenderResult<()> {
        let quoted = |name: &str| format!("\"{name}\"");
        let align = max_key(
            old.keys()
                .chain(new.keys())
                .map(|name| name.as_str()),
        ) + 2;

        for step in merge_by_name(old, new) {
            trace!(name = step.name(), "archive entry");
            let name = quoted(step.name());
            let title = Title::key(&name, align, level);

            match step {
                Merged::Both(_, ArchiveEntry::Asset(o), ArchiveEntry::Asset(n)) => {
                    self.print_asset_diff(title, o, n, level)?;
                }
                Merged::Both(_, ArchiveEntry::Archive(o), ArchiveEntry::Archive(n)) => {
                    self.print_archive_diff(title, o, n, level)?;
                }
                Merged::Both(_, o, n) => {
                    self.print_blob_replacement(title, o.into(), n.into(), level)?;
                }
                Merged::Deleted(_, entry) => {
                    title.print(&mut self.out, StepOp::Delete, true);
                    self.print_blob(entry.into(), level + 1, StepOp::Delete, true)?;
                }
                Merged::Added(_, entry) => {
                    title.print(&mut self.out, StepOp::Create, true);
                    self.print_blob(entry.into(), level + 1, StepOp::Create, true)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn print_asset_diff(
        &mut self,
        title: Title<'_>,
        old: &Asset,
        new: &Asset,
        level: usize,
    ) -> RenderResult<()> {
        if old.hash == new.hash {
            if !self.opts.summary {
                title.print(&mut self.out, StepOp::Same, false);
                self.out.write(StepOp::Same, &asset_header(old));
            }
            return Ok(());
        }

        let op = StepOp::Update;
        let hash_change = text_change(short_hash(&old.hash), short_hash(&new.hash));

        match (&old.source, &new.source) {
            (AssetSource::Text(_), AssetSource::Text(_)) => {
                title.print(&mut self.out, op, true);
                self.out.write(op, &format!("asset(text:{hash_change}) {{\n"));
                let debug = self.opts.debug;
                let runs = diff_lines(
                    old.display_text(debug).unwrap_or_default(),
                    new.display_text(debug).unwrap_or_default(),
                );
                self.print_text_diff(&runs, level + 1);
                self.out.write_with_indent(level, op, false, "}\n");
            }
            (AssetSource::Path(old_path), AssetSource::Path(new_path)) => {
                title.print(&mut self.out, op, true);
                self.out.write(
                    op,
                    &format!(
                        "asset(file:{hash_change}) {{ {} }}\n",
                        text_change(old_path, new_path)
                    ),
                );
            }
            (AssetSource::Uri(old_uri), AssetSource::Uri(new_uri)) => {
                title.print(&mut self.out, op, true);
                self.out.write(
                    op,
                    &format!(
                        "asset(uri:{hash_change}) {{ {} }}\n",
                        text_change(old_uri, new_uri)
                    ),
                );
            }
            _ => self.print_blob_replacement(title, Blob::Asset(old), Blob::Asset(new), level)?,
        }
        Ok(())
    }

    /// Show `old` removed and `new` added under the same title.
    fn print_blob_replacement(
        &mut self,
        title: Title<'_>,
        old: Blob<'_>,
        new: Blob<'_>,
        level: usize,
    ) -> RenderResult<()> {
        title.print(&mut self.out, StepOp::Delete, true);
        self.print_blob(old, level, StepOp::Delete, true)?;
        title.print(&mut self.out, StepOp::Create, true);
        self.print_blob(new, level, StepOp::Create, true)
    }
}
