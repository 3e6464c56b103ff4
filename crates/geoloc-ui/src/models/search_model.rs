//! Search model for QML: the address box inside the map.

use core::pin::Pin;

use cxx_qt::CxxQtType;
use cxx_qt_lib::QString;

use crate::bridge;
use crate::page::SearchControl;

#[cxx_qt::bridge]
pub mod qobject {
    unsafe extern "C++" {
        include!("cxx-qt-lib/qstring.h");
        type QString = cxx_qt_lib::QString;
    }

    extern "RustQt" {
        #[qobject]
        #[qml_element]
        #[qproperty(QString, query)]
        #[qproperty(bool, searching)]
        #[qproperty(i32, result_count)]
        type SearchModel = super::SearchModelRust;

        #[qinvokable]
        fn update_query(self: Pin<&mut SearchModel>, text: &QString);

        /// Search for the current query (Enter key or the search button).
        #[qinvokable]
        fn submit(self: Pin<&mut SearchModel>);

        /// Poll for finished searches. Call this from a QML Timer.
        #[qinvokable]
        fn poll_channel(self: Pin<&mut SearchModel>);

        #[qinvokable]
        fn result_label(self: &SearchModel, index: i32) -> QString;

        #[qinvokable]
        fn select_result(self: Pin<&mut SearchModel>, index: i32) -> bool;

        #[qsignal]
        fn result_selected(self: Pin<&mut SearchModel>, latitude: f64, longitude: f64);
    }
}

#[derive(Default)]
pub struct SearchModelRust {
    query: QString,
    searching: bool,
    result_count: i32,
    control: Option<SearchControl>,
}

impl SearchModelRust {
    fn ensure_initialized(&mut self) {
        if self.control.is_some() {
            return;
        }

        match bridge::get_services() {
            Some(services) => {
                self.control = Some(SearchControl::from_services(&services));
                tracing::info!("SearchModel auto-initialized from global services");
            }
            None => {
                tracing::error!("Cannot auto-initialize SearchModel - global services not ready");
            }
        }
    }
}

impl qobject::SearchModel {
    pub fn update_query(mut self: Pin<&mut Self>, text: &QString) {
        self.as_mut().rust_mut().ensure_initialized();
        if let Some(control) = self.as_mut().rust_mut().control.as_mut() {
            control.set_query(text.to_string());
        }
        self.as_mut().set_query(text.clone());
        self.sync();
    }

    pub fn submit(mut self: Pin<&mut Self>) {
        self.as_mut().rust_mut().ensure_initialized();
        if let Some(control) = self.as_mut().rust_mut().control.as_mut() {
            control.submit();
        }
        self.sync();
    }

    pub fn poll_channel(mut self: Pin<&mut Self>) {
        let changed = match self.as_mut().rust_mut().control.as_mut() {
            Some(control) => control.poll(),
            None => false,
        };

        if changed {
            self.sync();
        }
    }

    pub fn result_label(&self, index: i32) -> QString {
        self.rust()
            .control
            .as_ref()
            .zip(usize::try_from(index).ok())
            .and_then(|(control, i)| control.results().get(i))
            .map(|c| QString::from(c.label.as_str()))
            .unwrap_or_default()
    }

    /// Pick a result; the query box takes its short label and the map is
    /// told where to go through `result_selected`.
    pub fn select_result(mut self: Pin<&mut Self>, index: i32) -> bool {
        let Ok(index) = usize::try_from(index) else {
            return false;
        };

        let picked = self
            .as_mut()
            .rust_mut()
            .control
            .as_mut()
            .and_then(|control| control.select(index));
        let Some(at) = picked else {
            return false;
        };

        let label = self
            .rust()
            .control
            .as_ref()
            .map(|control| control.query().to_string())
            .unwrap_or_default();
        self.as_mut().set_query(QString::from(label.as_str()));
        self.as_mut().sync();
        self.as_mut().result_selected(at.latitude, at.longitude);
        true
    }

    fn sync(mut self: Pin<&mut Self>) {
        let (searching, count) = match self.rust().control.as_ref() {
            Some(control) => (control.is_searching(), control.results().len() as i32),
            None => (false, 0),
        };
        self.as_mut().set_searching(searching);
        self.as_mut().set_result_count(count);
    }
}
