//! Recursive rendering of an object diff.
//!
//! Keys are visited in lexicographic order and dispatched by which of the
//! diff's four maps holds them. Updates recurse into nested array and object
//! diffs; leaf updates of assets and archives go to the blob differ unless
//! the change forces the resource to be replaced, in which case a partial
//! blob diff would be misleading and the old and new values are shown whole.

use std::collections::BTreeSet;

use tracing::debug;

use plandiff_types::{ObjectDiff, PropertyKey, PropertyValue, StepOp, ValueDiff};

use crate::config::RenderOptions;
use crate::error::RenderResult;
use crate::printer::{max_key, Title};
use crate::renderer::Renderer;
use crate::value::should_print;

/// Render an object diff at indent level 1.
///
/// `replaces` lists the keys whose change forces replacement of the resource.
pub fn render_object_diff(
    diff: &ObjectDiff,
    replaces: &BTreeSet<PropertyKey>,
    opts: &RenderOptions,
) -> RenderResult<String> {
    debug!(keys = diff.keys().len(), replaces = replaces.len(), "rendering object diff");
    let mut r = Renderer::new(opts);
    r.print_object_diff(diff, replaces, false, 1)?;
    Ok(r.finish())
}

impl Renderer<'_> {
    /// # Panics
    ///
    /// Panics if `level` is zero: diff rows always carry a glyph.
    pub(crate) fn print_object_diff(
        &mut self,
        diff: &ObjectDiff,
        replaces: &BTreeSet<PropertyKey>,
        mut caused_replace: bool,
        level: usize,
    ) -> RenderResult<()> {
        assert!(level > 0, "object diffs render at a positive indent level");
        debug_assert!(diff.is_disjoint(), "a key may appear in only one diff map");

        let keys = diff.keys();
        let align = max_key(keys.iter().map(|k| k.as_str()));
        let planning = self.opts.planning;

        for key in keys {
            let title = Title::key(key.as_str(), align, level);

            if let Some(added) = diff.adds.get(key) {
                if should_print(added, planning) {
                    self.print_add(added, title, level)?;
                }
            } else if let Some(deleted) = diff.deletes.get(key) {
                if should_print(deleted, planning) {
                    self.print_delete(deleted, title, level)?;
                }
            } else if let Some(update) = diff.updates.get(key) {
                // Once set, the flag stays set for the rest of this walk and
                // for everything beneath it.
                if !caused_replace {
                    caused_replace = replaces.contains(key);
                }
                self.descend(|r| r.print_value_diff(title, update, caused_replace, level))?;
            } else if let Some(same) = diff.sames.get(key) {
                if !self.opts.summary && should_print(same, planning) {
                    title.print(&mut self.out, StepOp::Same, false);
                    self.print_value(same, level, StepOp::Same, false)?;
                }
            }
        }
        Ok(())
    }

    fn print_value_diff(
        &mut self,
        title: Title<'_>,
        diff: &ValueDiff,
        caused_replace: bool,
        level: usize,
    ) -> RenderResult<()> {
        let op = StepOp::Update;

        if let Some(array) = &diff.array {
            title.print(&mut self.out, op, true);
            self.out.write(op, "[\n");
            for i in 0..array.len {
                let elem = Title::index(i, level + 1);
                if let Some(added) = array.adds.get(&i) {
                    self.print_add(added, elem, level + 2)?;
                } else if let Some(deleted) = array.deletes.get(&i) {
                    self.print_delete(deleted, elem, level + 2)?;
                } else if let Some(update) = array.updates.get(&i) {
                    self.descend(|r| r.print_value_diff(elem, update, caused_replace, level + 2))?;
                } else if let Some(same) = array.sames.get(&i) {
                    if !self.opts.summary {
                        elem.print(&mut self.out, StepOp::Same, false);
                        self.print_value(same, level + 2, StepOp::Same, false)?;
                    }
                }
            }
            self.out.write_with_indent(level, op, false, "]\n");
            return Ok(());
        }

        if let Some(object) = &diff.object {
            title.print(&mut self.out, op, true);
            self.out.write(op, "{\n");
            self.print_object_diff(object, &BTreeSet::new(), caused_replace, level + 1)?;
            self.out.write_with_indent(level, op, false, "}\n");
            return Ok(());
        }

        let print_old = should_print(&diff.old, false);
        let print_new = should_print(&diff.new, false);

        if !caused_replace && print_old && print_new {
            match (&diff.old, &diff.new) {
                (PropertyValue::Asset(old), PropertyValue::Asset(new)) => {
                    return self.print_asset_diff(title, old, new, level);
                }
                (PropertyValue::Archive(old), PropertyValue::Archive(new)) => {
                    return self.print_archive_diff(title, old, new, level);
                }
                _ => {}
            }
        }

        // The values differ by kind or by scalar content, or the change
        // forces replacement: show the old value removed and the new one added.
        if print_old {
            self.print_delete(&diff.old, title, level)?;
        }
        if print_new {
            self.print_add(&diff.new, title, level)?;
        }
        Ok(())
    }

    fn print_add(&mut self, value: &PropertyValue, title: Title<'_>, level: usize) -> RenderResult<()> {
        title.print(&mut self.out, StepOp::Create, true);
        self.print_value(value, level, StepOp::Create, true)
    }

    fn print_delete(&mut self, value: &PropertyValue, title: Title<'_>, level: usize) -> RenderResult<()> {
        title.print(&mut self.out, StepOp::Delete, true);
        self.print_value(value, level, StepOp::Delete, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plandiff_types::colors::strip;
    use plandiff_types::{Archive, ArrayDiff, Asset, PropertyMap};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn render(diff: &ObjectDiff, replaces: &[&str], opts: &RenderOptions) -> String {
        let replaces = replaces.iter().map(|k| PropertyKey::from(*k)).collect();
        strip(&render_object_diff(diff, &replaces, opts).unwrap())
    }

    fn strings(items: &[&str]) -> PropertyValue {
        PropertyValue::Array(items.iter().map(|s| PropertyValue::from(*s)).collect())
    }

    fn glyphs(out: &str) -> BTreeSet<String> {
        out.lines()
            .filter(|l| l.len() >= 4)
            .map(|l| l[2..4].to_string())
            .collect()
    }

    #[test]
    fn adds_deletes_and_sames() {
        let diff = ObjectDiff::new()
            .with_add("acl", "private")
            .with_delete("tags", PropertyValue::object([("env", "dev")]))
            .with_same("name", "site");
        assert_eq!(
            render(&diff, &[], &RenderOptions::default()),
            concat!(
                "  + acl : \"private\"\n",
                "    name: \"site\"\n",
                "  - tags: {\n",
                "      - env: \"dev\"\n",
                "    }\n",
            )
        );
    }

    #[test]
    fn empty_values_are_omitted() {
        let diff = ObjectDiff::new()
            .with_add("a", "")
            .with_delete("b", PropertyValue::Null)
            .with_same("c", PropertyValue::Array(vec![]))
            .with_same("d", PropertyValue::Object(PropertyMap::new()));
        assert_eq!(render(&diff, &[], &RenderOptions::default()), "");
    }

    #[test]
    fn summary_mode_hides_sames() {
        let diff = ObjectDiff::new()
            .with_same("name", "site")
            .with_update("size", ValueDiff::leaf(1.0, 2.0));
        assert_eq!(
            render(&diff, &[], &RenderOptions::summary()),
            "  - size: 1\n  + size: 2\n"
        );
    }

    #[test]
    fn scalar_update_is_delete_then_add() {
        let diff = ObjectDiff::new().with_update("size", ValueDiff::leaf(1.0, "large"));
        assert_eq!(
            render(&diff, &[], &RenderOptions::default()),
            "  - size: 1\n  + size: \"large\"\n"
        );
    }

    #[test]
    fn update_to_empty_shows_only_removal() {
        let diff = ObjectDiff::new().with_update("desc", ValueDiff::leaf("old", ""));
        assert_eq!(render(&diff, &[], &RenderOptions::default()), "  - desc: \"old\"\n");
    }

    #[test]
    fn nested_object_diff_recurses() {
        let inner = ObjectDiff::new()
            .with_same("env", "dev")
            .with_update("owner", ValueDiff::leaf("a", "b"));
        let diff = ObjectDiff::new().with_update(
            "tags",
            ValueDiff::object(
                PropertyValue::object([("env", "dev"), ("owner", "a")]),
                PropertyValue::object([("env", "dev"), ("owner", "b")]),
                inner,
            ),
        );
        assert_eq!(
            render(&diff, &[], &RenderOptions::default()),
            concat!(
                "  ~ tags: {\n",
                "        env  : \"dev\"\n",
                "      - owner: \"a\"\n",
                "      + owner: \"b\"\n",
                "    }\n",
            )
        );
    }

    #[test]
    fn array_diff_walks_indices_in_order() {
        let array = ArrayDiff::new(3)
            .with_same(0, "a")
            .with_update(1, ValueDiff::leaf("b", "B"))
            .with_add(2, "c");
        let diff = ObjectDiff::new().with_update(
            "items",
            ValueDiff::array(strings(&["a", "b"]), strings(&["a", "B", "c"]), array),
        );
        assert_eq!(
            render(&diff, &[], &RenderOptions::default()),
            concat!(
                "  ~ items: [\n",
                "        [0]: \"a\"\n",
                "      - [1]: \"b\"\n",
                "      + [1]: \"B\"\n",
                "      + [2]: \"c\"\n",
                "    ]\n",
            )
        );
    }

    #[test]
    fn array_sames_hidden_in_summary() {
        let array = ArrayDiff::new(2).with_same(0, "a").with_delete(1, "b");
        let diff = ObjectDiff::new().with_update(
            "items",
            ValueDiff::array(strings(&["a", "b"]), strings(&["a"]), array),
        );
        let out = render(&diff, &[], &RenderOptions::summary());
        assert!(!out.contains("[0]"));
        assert!(out.contains("      - [1]: \"b\"\n"));
    }

    #[test]
    fn asset_update_uses_blob_differ() {
        let diff = ObjectDiff::new().with_update(
            "code",
            ValueDiff::leaf(Asset::from_path("a.js", "h1"), Asset::from_path("a.js", "h2")),
        );
        assert_eq!(
            render(&diff, &[], &RenderOptions::default()),
            "  ~ code: asset(file:h1->h2) { a.js }\n"
        );
    }

    #[test]
    fn replacing_key_forces_whole_value_rows() {
        let diff = ObjectDiff::new().with_update(
            "code",
            ValueDiff::leaf(Archive::from_path("a.zip", "h1"), Archive::from_path("a.zip", "h2")),
        );
        assert_eq!(
            render(&diff, &["code"], &RenderOptions::default()),
            "  - code: archive(file:h1) { a.zip }\n  + code: archive(file:h2) { a.zip }\n"
        );
    }

    #[test]
    fn replacement_propagates_to_descendants() {
        let inner = ObjectDiff::new().with_update(
            "handler",
            ValueDiff::leaf(Asset::from_path("a.js", "h1"), Asset::from_path("a.js", "h2")),
        );
        let diff = ObjectDiff::new().with_update(
            "lambda",
            ValueDiff::object(PropertyValue::Null, PropertyValue::Null, inner),
        );
        let out = render(&diff, &["lambda"], &RenderOptions::default());
        assert!(out.contains("      - handler: asset(file:h1) { a.js }\n"), "{out}");
        assert!(out.contains("      + handler: asset(file:h2) { a.js }\n"), "{out}");
        assert!(!out.contains("h1->h2"));
    }

    #[test]
    fn replacement_carries_to_later_siblings() {
        let asset_update =
            || ValueDiff::leaf(Asset::from_path("a.js", "h1"), Asset::from_path("a.js", "h2"));
        let diff = ObjectDiff::new()
            .with_update("a", ValueDiff::leaf(1.0, 2.0))
            .with_update("b", asset_update());
        let out = render(&diff, &["a"], &RenderOptions::default());
        assert!(!out.contains("h1->h2"), "{out}");

        // A replacing key sorted after the asset does not reach back.
        let diff = ObjectDiff::new()
            .with_update("a", asset_update())
            .with_update("b", ValueDiff::leaf(1.0, 2.0));
        let out = render(&diff, &["b"], &RenderOptions::default());
        assert!(out.contains("h1->h2"), "{out}");
    }

    #[test]
    fn identical_trees_render_only_same_rows() {
        let diff = ObjectDiff::new()
            .with_same("name", "site")
            .with_same("tags", PropertyValue::object([("env", "dev")]))
            .with_same("ports", PropertyValue::Array(vec![PropertyValue::from(80.0), PropertyValue::from(443.0)]));
        let out = render(&diff, &[], &RenderOptions::default());
        assert!(!out.is_empty());
        assert_eq!(glyphs(&out), BTreeSet::from(["  ".to_string()]));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut diff = ObjectDiff::new().with_update("leaf", ValueDiff::leaf(1.0, 2.0));
        for _ in 0..20 {
            diff = ObjectDiff::new().with_update(
                "x",
                ValueDiff::object(PropertyValue::Null, PropertyValue::Null, diff),
            );
        }
        let opts = RenderOptions {
            max_depth: 10,
            ..Default::default()
        };
        assert!(render_object_diff(&diff, &BTreeSet::new(), &opts).is_err());
    }

    #[test]
    #[should_panic(expected = "positive indent level")]
    fn level_zero_is_a_contract_violation() {
        let opts = RenderOptions::default();
        let mut r = Renderer::new(&opts);
        let _ = r.print_object_diff(&ObjectDiff::new(), &BTreeSet::new(), false, 0);
    }

    #[test]
    fn marker_like_property_text_survives_stripping() {
        let diff = ObjectDiff::new()
            .with_add("tmpl", "<{%}>")
            .with_same("note", "a<{%%}>b");
        assert_eq!(
            render(&diff, &[], &RenderOptions::default()),
            "    note: \"a<{%%}>b\"\n  + tmpl: \"<{%}>\"\n"
        );
    }

    proptest! {
        #[test]
        fn rows_follow_byte_order_of_keys(
            entries in proptest::collection::vec(("[a-zA-Zéß]{1,6}", 0u8..4), 0..12),
        ) {
            // Later duplicates win, leaving one entry per key.
            let unique: BTreeMap<&str, u8> =
                entries.iter().map(|(k, kind)| (k.as_str(), *kind)).collect();
            let build = |pairs: Vec<(&str, u8)>| {
                pairs.into_iter().fold(ObjectDiff::new(), |d, (k, kind)| match kind {
                    0 => d.with_add(k, k),
                    1 => d.with_delete(k, k),
                    2 => d.with_same(k, k),
                    _ => d.with_update(k, ValueDiff::leaf(k, "new")),
                })
            };
            let forward = build(unique.iter().map(|(k, v)| (*k, *v)).collect());
            let backward = build(unique.iter().rev().map(|(k, v)| (*k, *v)).collect());

            let opts = RenderOptions::default();
            let out = strip(&render_object_diff(&forward, &BTreeSet::new(), &opts).unwrap());
            prop_assert_eq!(
                &out,
                &strip(&render_object_diff(&backward, &BTreeSet::new(), &opts).unwrap())
            );

            let mut titles: Vec<&str> = out
                .lines()
                .filter_map(|l| l.get(4..))
                .filter_map(|l| l.split(':').next())
                .map(str::trim_end)
                .collect();
            titles.dedup();

            let mut expected: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(titles, expected);
        }

        #[test]
        fn sames_only_never_show_change_glyphs(
            entries in proptest::collection::btree_map("[a-z]{1,6}", "[a-z]{0,4}", 0..12),
        ) {
            let diff = entries
                .iter()
                .fold(ObjectDiff::new(), |d, (k, v)| d.with_same(k.as_str(), v.as_str()));
            let out = render(&diff, &[], &RenderOptions::default());
            for glyph in glyphs(&out) {
                prop_assert_eq!(glyph, "  ");
            }
        }
    }
}
