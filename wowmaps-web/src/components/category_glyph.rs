use wowmaps_core::model::CategoryIcon;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub icon: AttrValue,
}

#[must_use]
pub const fn glyph(icon: CategoryIcon) -> &'static str {
    match icon {
        CategoryIcon::Sword => "\u{2694}",
        CategoryIcon::Activity => "\u{223F}",
        CategoryIcon::Zap => "\u{26A1}",
        CategoryIcon::Target => "\u{25CE}",
        CategoryIcon::Ghost => "\u{1F47B}",
    }
}

/// Icon badge for a category; unknown names render as the sword.
#[function_component(CategoryGlyph)]
pub fn category_glyph(p: &Props) -> Html {
    let icon = CategoryIcon::from_name(&p.icon);
    html! {
        <span class="category-glyph" data-icon={icon.name()} aria-hidden="true">
            { glyph(icon) }
        </span>
    }
}
