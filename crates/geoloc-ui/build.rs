use cxx_qt_build::{CxxQtBuilder, QmlModule};

fn main() {
    CxxQtBuilder::new_qml_module(
        QmlModule::new("geoloc_ui")
            .qml_file("qml/Main.qml")
            .qml_file("qml/GeoBackdrop.qml")
            .qml_file("qml/GeoMap.qml")
            .qml_file("qml/InfoCardGrid.qml")
            .qml_file("qml/MapPin.qml"),
    )
    .file("src/models/background_model.rs")
    .file("src/models/map_model.rs")
    .file("src/models/page_model.rs")
    .file("src/models/search_model.rs")
    .build();
}
