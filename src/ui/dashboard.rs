/// Dashboard page: every open tab with its summary and category

use crate::bridge::{self, ChromeStorage};
use crate::dashboard::{DashboardAction, DashboardState, Layout, initial_records};
use crate::host::Timer;
use crate::operations::{CategoryFilter, SortKey};
use crate::registry::TabRegistry;
use crate::tab_data::{Category, TabId, TabRecord};
use crate::ui::components::{FilterButton, TabCard};
use chrono::Utc;
use patternfly_yew::prelude::*;
use std::collections::HashSet;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

const NOTICE_MS: u32 = 3000;

impl Reducible for DashboardState {
    type Action = DashboardAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let state = use_reducer(DashboardState::new);

    // Follow tab and storage events first; the reducer holds them until the load lands
    {
        let dispatcher = state.dispatcher();
        use_effect_with((), move |_| {
            subscribe(dispatcher.clone());
            spawn_local(async move {
                match load_records().await {
                    Ok(records) => dispatcher.dispatch(DashboardAction::Loaded(records)),
                    Err(e) => {
                        log::error!("Failed to initialize dashboard: {}", e);
                        dispatcher.dispatch(DashboardAction::Loaded(Vec::new()));
                    }
                }
            });
            || ()
        });
    }

    // Auto-dismiss the transient notice
    {
        let dispatcher = state.dispatcher();
        let notice_id = state.notice().map(|n| n.id);
        use_effect_with(notice_id, move |notice_id| {
            if let Some(id) = *notice_id {
                spawn_local(async move {
                    bridge::JsTimer.sleep(NOTICE_MS).await;
                    dispatcher.dispatch(DashboardAction::DismissNotice(id));
                });
            }
            || ()
        });
    }

    let on_filter = {
        let dispatcher = state.dispatcher();
        move |filter: CategoryFilter| {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_| dispatcher.dispatch(DashboardAction::SetFilter(filter)))
        }
    };

    let on_search_input = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                dispatcher.dispatch(DashboardAction::SetSearch(input.value()));
            }
        })
    };

    let on_sort_change = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                if let Some(sort) = SortKey::from_value(&select.value()) {
                    dispatcher.dispatch(DashboardAction::SetSort(sort));
                }
            }
        })
    };

    let on_layout_toggle = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let layout = if input.checked() { Layout::List } else { Layout::Grid };
                dispatcher.dispatch(DashboardAction::SetLayout(layout));
            }
        })
    };

    let on_card_click = {
        let dispatcher = state.dispatcher();
        move |tab_id: TabId| {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_| {
                let dispatcher = dispatcher.clone();
                spawn_local(async move {
                    if let Err(e) = bridge::activate_tab(tab_id).await {
                        log::warn!("{}", e);
                        dispatcher.dispatch(DashboardAction::ActivateFailed(tab_id));
                    }
                });
            })
        }
    };

    let filters: Vec<(String, CategoryFilter)> = std::iter::once(("All".to_string(), CategoryFilter::All))
        .chain(Category::ALL.into_iter().map(|c| (c.label().to_string(), CategoryFilter::Only(c))))
        .collect();

    let container_class = match state.layout() {
        Layout::Grid => "grid-layout",
        Layout::List => "list-layout",
    };

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"Tab Lens"}</h1>
                <span id="tab-count">{state.count_label()}</span>
            </div>

            if let Some(notice) = state.notice() {
                <div class="error-message">
                    <Alert r#type={AlertType::Danger} title={notice.message.clone()} inline={true}>
                    </Alert>
                </div>
            }

            <div id="categories">
                {for filters.into_iter().map(|(label, filter)| html! {
                    <FilterButton
                        label={label}
                        active={state.filter() == filter}
                        onclick={on_filter(filter)}
                    />
                })}
            </div>

            <div class="controls">
                <input
                    id="search-input"
                    type="text"
                    placeholder="Search titles and summaries..."
                    value={state.search().to_string()}
                    oninput={on_search_input}
                    class="search-input"
                />
                <select id="sort-by" onchange={on_sort_change}>
                    {for SortKey::ALL.into_iter().map(|key| html! {
                        <option value={key.value()} selected={state.sort() == key}>{key.label()}</option>
                    })}
                </select>
                <label class="layout-toggle">
                    <input
                        id="layout-toggle"
                        type="checkbox"
                        checked={state.layout() == Layout::List}
                        onchange={on_layout_toggle}
                    />
                    {"List view"}
                </label>
            </div>

            if state.is_loading() {
                <div class="loading-text-center">
                    <Spinner />
                    <p class="loading-text">{"Loading tabs..."}</p>
                </div>
            } else if state.tab_count() == 0 {
                <div class="empty-state">
                    <p>{"No tabs tracked yet."}</p>
                </div>
            } else {
                <div id="dashboard-container" class={container_class}>
                    {for state.cards().into_iter().map(|card| html! {
                        <TabCard
                            key={card.record.id}
                            record={card.record.clone()}
                            visible={card.visible}
                            onclick={on_card_click(card.record.id)}
                        />
                    })}
                </div>
            }
        </div>
    }
}

// Helper functions

async fn load_records() -> Result<Vec<TabRecord>, String> {
    let tabs = bridge::query_tabs().await?;
    let registry = TabRegistry::new(ChromeStorage);

    let open: HashSet<TabId> = tabs.iter().map(|tab| tab.id).collect();
    registry
        .reconcile(&open)
        .await
        .map_err(|e| format!("Failed to clean up closed tabs: {}", e))?;

    let snapshot = registry
        .snapshot()
        .await
        .map_err(|e| format!("Failed to load records: {}", e))?;

    Ok(initial_records(&tabs, &snapshot.records, Utc::now()))
}

fn subscribe(dispatcher: UseReducerDispatcher<DashboardState>) {
    {
        let dispatcher = dispatcher.clone();
        bridge::on_tab_updated(move |tab| {
            dispatcher.dispatch(DashboardAction::TabUpdated(tab, Utc::now()));
        });
    }
    {
        let dispatcher = dispatcher.clone();
        bridge::on_record_stored(move |record| {
            dispatcher.dispatch(DashboardAction::RecordStored(record));
        });
    }
    bridge::on_tab_removed(move |tab_id| {
        dispatcher.dispatch(DashboardAction::TabRemoved(tab_id));
    });
}
