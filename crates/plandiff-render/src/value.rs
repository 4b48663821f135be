//! Rendering of a single property value, with no diff context.

use plandiff_types::{
    Archive, ArchiveEntry, ArchiveSource, Asset, AssetSource, PropertyMap, PropertyValue, StepOp,
};

use crate::config::RenderOptions;
use crate::error::RenderResult;
use crate::printer::{format_number, max_key, short_hash, Title};
use crate::renderer::Renderer;

/// Whether a value is worth a row of its own.
///
/// Nulls, empty strings, and empty containers are usually uninteresting
/// defaults and are omitted. Unresolved outputs are shown only when
/// `show_outputs` is set.
pub fn should_print(value: &PropertyValue, show_outputs: bool) -> bool {
    match value {
        PropertyValue::Null => false,
        PropertyValue::String(s) => !s.is_empty(),
        PropertyValue::Array(elems) => !elems.is_empty(),
        PropertyValue::Object(props) => !props.is_empty(),
        PropertyValue::Output(_) => show_outputs,
        PropertyValue::Bool(_)
        | PropertyValue::Number(_)
        | PropertyValue::Asset(_)
        | PropertyValue::Archive(_)
        | PropertyValue::Computed(_) => true,
    }
}

/// Render one value as it would appear after a property title at `level`.
pub fn render_value(
    value: &PropertyValue,
    level: usize,
    op: StepOp,
    opts: &RenderOptions,
) -> RenderResult<String> {
    let mut r = Renderer::new(opts);
    r.print_value(value, level, op, false)?;
    Ok(r.finish())
}

/// Render a property map as aligned `key: value` rows at `level`.
pub fn render_object(
    props: &PropertyMap,
    level: usize,
    op: StepOp,
    opts: &RenderOptions,
) -> RenderResult<String> {
    let mut r = Renderer::new(opts);
    r.print_object(props, level, op, false)?;
    Ok(r.finish())
}

/// A borrowed asset or archive, so blobs can be printed without building a
/// [`PropertyValue`] around them.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Blob<'a> {
    Asset(&'a Asset),
    Archive(&'a Archive),
}

impl<'a> From<&'a ArchiveEntry> for Blob<'a> {
    fn from(entry: &'a ArchiveEntry) -> Self {
        match entry {
            ArchiveEntry::Asset(a) => Blob::Asset(a),
            ArchiveEntry::Archive(a) => Blob::Archive(a),
        }
    }
}

impl Renderer<'_> {
    pub(crate) fn print_object(
        &mut self,
        props: &PropertyMap,
        level: usize,
        op: StepOp,
        prefix: bool,
    ) -> RenderResult<()> {
        let align = max_key(props.keys().map(|k| k.as_str()));
        for (key, value) in props {
            if should_print(value, self.opts.planning) {
                Title::key(key.as_str(), align, level).print(&mut self.out, op, prefix);
                self.print_value(value, level, op, prefix)?;
            }
        }
        Ok(())
    }

    /// Print `value` followed by a newline.
    pub(crate) fn print_value(
        &mut self,
        value: &PropertyValue,
        level: usize,
        op: StepOp,
        prefix: bool,
    ) -> RenderResult<()> {
        self.descend(|r| r.print_value_body(value, level, op, prefix))?;
        self.out.write(op, "\n");
        Ok(())
    }

    fn print_value_body(
        &mut self,
        value: &PropertyValue,
        level: usize,
        op: StepOp,
        prefix: bool,
    ) -> RenderResult<()> {
        match value {
            PropertyValue::Null => self.out.write(op, "<null>"),
            PropertyValue::Bool(b) => self.out.write(op, &b.to_string()),
            PropertyValue::Number(n) => self.out.write(op, &format_number(*n)),
            PropertyValue::String(s) => self.out.write(op, &format!("{s:?}")),
            PropertyValue::Array(elems) if elems.is_empty() => self.out.write(op, "[]"),
            PropertyValue::Array(elems) => {
                self.out.write(op, "[\n");
                for (i, elem) in elems.iter().enumerate() {
                    self.out.write_with_indent(level, op, prefix, &format!("    [{i}]: "));
                    self.print_value(elem, level + 1, op, prefix)?;
                }
                self.out.write_with_indent(level, op, false, "]");
            }
            PropertyValue::Object(props) if props.is_empty() => self.out.write(op, "{}"),
            PropertyValue::Object(props) => {
                self.out.write(op, "{\n");
                self.print_object(props, level + 1, op, prefix)?;
                self.out.write_with_indent(level, op, false, "}");
            }
            PropertyValue::Asset(asset) => self.print_asset(asset, level, op),
            PropertyValue::Archive(archive) => self.print_archive(archive, level, op, prefix)?,
            // Outside planning the renderer cannot tell an absent user value
            // from one sourced from an unresolved output, so both print as
            // `undefined`.
            PropertyValue::Computed(_) | PropertyValue::Output(_) => {
                if self.opts.planning {
                    self.out.write(op, &value.type_string());
                } else {
                    self.out.write(op, "undefined");
                }
            }
        }
        Ok(())
    }

    /// Print an asset or archive followed by a newline.
    pub(crate) fn print_blob(
        &mut self,
        blob: Blob<'_>,
        level: usize,
        op: StepOp,
        prefix: bool,
    ) -> RenderResult<()> {
        self.descend(|r| match blob {
            Blob::Asset(asset) => {
                r.print_asset(asset, level, op);
                Ok(())
            }
            Blob::Archive(archive) => r.print_archive(archive, level, op, prefix),
        })?;
        self.out.write(op, "\n");
        Ok(())
    }

    fn print_asset(&mut self, asset: &Asset, level: usize, op: StepOp) {
        let hash = short_hash(&asset.hash);
        match &asset.source {
            AssetSource::Text(_) => {
                self.out.write(op, &format!("asset(text:{hash}) {{\n"));
                let text = asset.display_text(self.opts.debug).unwrap_or_default();
                for line in text.split('\n') {
                    self.out.write_with_indent(level, op, false, &format!("    {line}\n"));
                }
                self.out.write_with_indent(level, op, false, "}");
            }
            AssetSource::Path(path) => {
                self.out.write(op, &format!("asset(file:{hash}) {{ {path} }}"));
            }
            AssetSource::Uri(uri) => {
                self.out.write(op, &format!("asset(uri:{hash}) {{ {uri} }}"));
            }
        }
    }

    fn print_archive(
        &mut self,
        archive: &Archive,
        level: usize,
        op: StepOp,
        prefix: bool,
    ) -> RenderResult<()> {
        let hash = short_hash(&archive.hash);
        match &archive.source {
            ArchiveSource::Assets(entries) => {
                self.out.write(op, &format!("archive(assets:{hash}) {{\n"));
                for (name, entry) in entries {
                    self.out
                        .write_with_indent(level, op, prefix, &format!("    \"{name}\": "));
                    self.print_blob(entry.into(), level + 1, op, prefix)?;
                }
                self.out.write_with_indent(level, op, false, "}");
            }
            ArchiveSource::Path(path) => {
                self.out.write(op, &format!("archive(file:{hash}) {{ {path} }}"));
            }
            ArchiveSource::Uri(uri) => {
                self.out.write(op, &format!("archive(uri:{hash}) {{ {uri} }}"));
            }
        }
        Ok(())
    }
}
