/*
    Reads derivation trees back out of a chart's back-pointers
*/

use super::chart::{Chart, LabelId};

impl Chart {
    /// Bracketed derivation rooted at `id`, e.g. `(S (NP dog) (VP barks))`.
    /// Leaves are written bare; a label with children is written as its
    /// symbol followed by the left then the right subtree, in parentheses.
    pub fn tree(&self, id: LabelId) -> Option<String> {
        let mut out = String::new();
        self.write_tree(id, &mut out)?;
        Some(out)
    }

    fn write_tree(&self, id: LabelId, out: &mut String) -> Option<()> {
        let label = self.label(id)?;
        let name = label.symbol().text();

        if label.is_leaf() {
            out.push_str(name);
            return Some(());
        }

        out.push('(');
        out.push_str(name);
        for child in label.left().into_iter().chain(label.right()) {
            out.push(' ');
            self.write_tree(child, out)?;
        }
        out.push(')');
        Some(())
    }

    /// Same tree, one node per line and indented by depth.
    pub fn pretty_tree(&self, id: LabelId) -> Option<String> {
        let mut out = String::new();
        let mut stack = vec![(id, 0)];
        while let Some((id, depth)) = stack.pop() {
            let label = self.label(id)?;
            out.push_str(&format!("{}{}\n", "  ".repeat(depth), label.symbol().text()));
            stack.extend(label.right().map(|right| (right, depth + 1)));
            stack.extend(label.left().map(|left| (left, depth + 1)));
        }
        Some(out)
    }
}
