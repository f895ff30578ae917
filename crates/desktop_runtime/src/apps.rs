use desktop_app_contract::{builtin, ApplicationId, WindowContent};

use crate::{
    model::{OpenWindowRequest, Rect, Size},
    vfs::{FileSystemItem, FileRecord},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppDescriptor {
    pub application_id: &'static str,
    pub title: &'static str,
    pub default_size: Option<Size>,
    pub min_size: Option<Size>,
}

const APP_REGISTRY: [AppDescriptor; 8] = [
    AppDescriptor {
        application_id: builtin::EXPLORER,
        title: "File Explorer",
        default_size: Some(Size::new(900.0, 600.0)),
        min_size: Some(Size::new(400.0, 300.0)),
    },
    AppDescriptor {
        application_id: builtin::GALLERY,
        title: "Photos",
        default_size: Some(Size::new(960.0, 640.0)),
        min_size: None,
    },
    AppDescriptor {
        application_id: builtin::DOCUMENT_VIEWER,
        title: "Document Viewer",
        default_size: None,
        min_size: None,
    },
    AppDescriptor {
        application_id: builtin::NOTEPAD,
        title: "Notepad",
        default_size: Some(Size::new(640.0, 480.0)),
        min_size: None,
    },
    AppDescriptor {
        application_id: builtin::TERMINAL,
        title: "Terminal",
        default_size: Some(Size::new(720.0, 440.0)),
        min_size: Some(Size::new(360.0, 220.0)),
    },
    AppDescriptor {
        application_id: builtin::MAIL,
        title: "Mail",
        default_size: Some(Size::new(1000.0, 680.0)),
        min_size: None,
    },
    AppDescriptor {
        application_id: builtin::BROWSER,
        title: "Browser",
        default_size: Some(Size::new(1024.0, 720.0)),
        min_size: None,
    },
    AppDescriptor {
        application_id: builtin::SETTINGS,
        title: "Settings",
        default_size: Some(Size::new(720.0, 560.0)),
        min_size: Some(Size::new(480.0, 360.0)),
    },
];

pub fn app_registry() -> &'static [AppDescriptor] {
    &APP_REGISTRY
}

pub fn app_descriptor(application_id: &ApplicationId) -> Option<&'static AppDescriptor> {
    app_registry()
        .iter()
        .find(|entry| entry.application_id == application_id.as_str())
}

/// Application a file opens with when it carries no explicit association.
pub fn default_application_for_extension(extension: &str) -> ApplicationId {
    let id = match extension {
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => builtin::GALLERY,
        "pdf" | "md" | "markdown" => builtin::DOCUMENT_VIEWER,
        "html" | "htm" => builtin::BROWSER,
        "lnk" => builtin::TERMINAL,
        _ => builtin::NOTEPAD,
    };
    ApplicationId::trusted(id)
}

pub fn application_for_file(file: &FileRecord) -> ApplicationId {
    file.open_with
        .clone()
        .unwrap_or_else(|| default_application_for_extension(&file.extension))
}

pub fn application_for_item(item: &FileSystemItem) -> ApplicationId {
    match item {
        FileSystemItem::File(file) => application_for_file(file),
        FileSystemItem::Folder(_) => ApplicationId::trusted(builtin::EXPLORER),
    }
}

/// Open request carrying the registry defaults for `application_id`.
pub fn default_open_request(application_id: ApplicationId, bounds: Rect) -> OpenWindowRequest {
    let descriptor = app_descriptor(&application_id);
    let mut req = OpenWindowRequest::new(application_id, bounds);
    if let Some(descriptor) = descriptor {
        req.title = Some(descriptor.title.to_string());
        req.size = descriptor.default_size;
        req.min_size = descriptor.min_size;
    }
    req
}

/// Open request for viewing `item`; the content descriptor points at the item path.
pub fn open_request_for_item(item: &FileSystemItem, bounds: Rect) -> OpenWindowRequest {
    let application_id = application_for_item(item);
    let mut req = default_open_request(application_id.clone(), bounds);
    req.content = Some(WindowContent::for_path(application_id, item.path()));
    req
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{FileSpec, FileSystemTree};

    #[test]
    fn every_builtin_has_a_descriptor() {
        for id in [
            builtin::EXPLORER,
            builtin::GALLERY,
            builtin::DOCUMENT_VIEWER,
            builtin::NOTEPAD,
            builtin::TERMINAL,
            builtin::MAIL,
            builtin::BROWSER,
            builtin::SETTINGS,
        ] {
            assert!(app_descriptor(&ApplicationId::trusted(id)).is_some(), "{id}");
        }
    }

    #[test]
    fn explicit_association_wins_over_extension_default() {
        let mut tree = FileSystemTree::new();
        tree.create_file("/", FileSpec::new("photo.png")).expect("png");
        tree.create_file(
            "/",
            FileSpec::new("notes.png").with_open_with(ApplicationId::trusted(builtin::NOTEPAD)),
        )
        .expect("notes");

        let photo = tree.item("/photo.png").expect("photo");
        let notes = tree.item("/notes.png").expect("notes");
        assert_eq!(application_for_item(photo).as_str(), builtin::GALLERY);
        assert_eq!(application_for_item(notes).as_str(), builtin::NOTEPAD);
    }

    #[test]
    fn item_request_points_content_at_path() {
        let mut tree = FileSystemTree::new();
        tree.create_folder("/", "Music").expect("folder");
        let folder = tree.item("/Music").expect("folder");
        let req = open_request_for_item(folder, Rect::new(0.0, 0.0, 1280.0, 720.0));

        assert_eq!(req.component.as_str(), builtin::EXPLORER);
        let content = req.content.expect("content");
        assert_eq!(content.resolved_url.as_deref(), Some("/Music"));
        assert!(content.loading);
        assert_eq!(req.title.as_deref(), Some("File Explorer"));
    }
}
