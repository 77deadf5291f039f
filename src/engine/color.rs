use crate::models::NoteColor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ColorTarget {
    /// The note root takes background and border.
    Note,
    /// The toolbar only takes the border.
    Toolbar,
}

/// Drop every palette class from `classes` and add the ones for `color`.
pub(crate) fn restyle(classes: &str, color: NoteColor, target: ColorTarget) -> String {
    let mut out: Vec<&str> = classes
        .split_whitespace()
        .filter(|c| !NoteColor::is_palette_class(c))
        .collect();
    if target == ColorTarget::Note {
        out.push(color.background_class());
    }
    out.push(color.border_class());
    out.join(" ")
}
