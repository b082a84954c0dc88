use gloo_storage::{LocalStorage, Storage};
use web_sys::window;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Stored preference, falling back to the OS preference.
    fn initial() -> Self {
        if let Ok(stored) = LocalStorage::get::<String>("theme") {
            return Theme::from_str(&stored);
        }
        let prefers_dark = window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok())
            .flatten()
            .map(|mq| mq.matches())
            .unwrap_or(false);
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }

    /// Reflects the theme onto the document root's class list.
    fn apply(self) {
        let Some(html) = window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        let class_list = html.class_list();
        match self {
            Theme::Dark => class_list.add_1("dark").ok(),
            Theme::Light => class_list.remove_1("dark").ok(),
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeContext {
    pub theme: Theme,
    pub toggle: Callback<()>,
}

#[derive(Properties, PartialEq)]
pub struct ThemeProviderProps {
    pub children: Children,
}

#[function_component(ThemeProvider)]
pub fn theme_provider(props: &ThemeProviderProps) -> Html {
    let theme = use_state(Theme::initial);

    let toggle = {
        let theme = theme.clone();
        Callback::from(move |_| {
            let new_theme = match *theme {
                Theme::Light => Theme::Dark,
                Theme::Dark => Theme::Light,
            };
            LocalStorage::set("theme", new_theme.as_str()).ok();
            theme.set(new_theme);
        })
    };

    use_effect_with(*theme, |theme| theme.apply());

    let context = ThemeContext {
        theme: *theme,
        toggle,
    };

    html! {
        <ContextProvider<ThemeContext> context={context}>
            {props.children.clone()}
        </ContextProvider<ThemeContext>>
    }
}

#[hook]
pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("use_theme must be used within a ThemeProvider")
}
