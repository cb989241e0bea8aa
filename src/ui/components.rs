/// Reusable UI components

use crate::tab_data::{Category, DEFAULT_FAVICON, TabRecord};
use web_sys::HtmlImageElement;
use yew::prelude::*;

pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Research => "#FF6B6B",
        Category::Assignments => "#4ECDC4",
        Category::LectureNotes => "#45B7D1",
        Category::Miscellaneous => "#96CEB4",
    }
}

/// Source to swap in for a favicon that failed to load. None once the default itself failed.
pub fn favicon_fallback(failed_src: &str) -> Option<&'static str> {
    if failed_src.ends_with(DEFAULT_FAVICON) {
        None
    } else {
        Some(DEFAULT_FAVICON)
    }
}

#[derive(Properties, PartialEq)]
pub struct CategoryChipProps {
    pub category: Category,
}

#[function_component(CategoryChip)]
pub fn category_chip(props: &CategoryChipProps) -> Html {
    html! {
        <span
            class="tab-category"
            style={format!("background-color: {}; color: white; padding: 2px 8px; border-radius: 10px; font-size: 12px;", category_color(props.category))}
        >
            {props.category.label()}
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct FilterButtonProps {
    pub label: String,
    pub active: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(FilterButton)]
pub fn filter_button(props: &FilterButtonProps) -> Html {
    let class = if props.active { "category-btn active" } else { "category-btn" };

    html! {
        <button class={class} onclick={props.onclick.clone()}>
            {&props.label}
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct TabCardProps {
    pub record: TabRecord,
    pub visible: bool,
    pub onclick: Callback<MouseEvent>,
}

/// One tracked tab. Hidden cards stay mounted so filtering never drops them.
#[function_component(TabCard)]
pub fn tab_card(props: &TabCardProps) -> Html {
    let record = &props.record;
    let style = if props.visible { "" } else { "display: none;" };
    let on_favicon_error = Callback::from(|e: Event| {
        if let Some(img) = e.target_dyn_into::<HtmlImageElement>() {
            if let Some(fallback) = favicon_fallback(&img.src()) {
                img.set_src(fallback);
            }
        }
    });

    html! {
        <div class="tab-card" style={style} onclick={props.onclick.clone()}>
            <img class="tab-favicon" src={record.favicon.clone()} alt="" onerror={on_favicon_error} />
            <div class="tab-content">
                <div class="tab-title">{&record.title}</div>
                <div class="tab-summary">{&record.summary}</div>
                <CategoryChip category={record.category} />
            </div>
        </div>
    }
}
