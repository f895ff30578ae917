//! Sample folders and files a fresh session starts with.

use desktop_app_contract::{builtin, ApplicationId};
use leptos::logging;

use super::{item::FileSpec, tree::FileSystemTree};

const SEED_FOLDERS: [(&str, &str); 6] = [
    ("/", "Documents"),
    ("/", "Pictures"),
    ("/", "Desktop"),
    ("/", "Downloads"),
    ("/Documents", "Projects"),
    ("/Pictures", "Wallpapers"),
];

fn seed_files() -> Vec<(&'static str, FileSpec)> {
    vec![
        (
            "/Documents",
            FileSpec::new("Welcome.md")
                .with_content("# Welcome\n\nDrag windows to an edge to snap them."),
        ),
        (
            "/Documents",
            FileSpec::new("todo.txt").with_content("- tidy the desktop\n- empty the trash\n"),
        ),
        (
            "/Documents/Projects",
            FileSpec::new("notes.txt").with_content("Project notes"),
        ),
        ("/Pictures", FileSpec::new("sunset.jpg").with_size(245_760)),
        ("/Pictures", FileSpec::new("mountains.png").with_size(512_000)),
        (
            "/Pictures/Wallpapers",
            FileSpec::new("aurora.webp").with_size(389_120),
        ),
        (
            "/Desktop",
            FileSpec::new("Terminal.lnk")
                .with_size(1)
                .with_open_with(ApplicationId::trusted(builtin::TERMINAL)),
        ),
        ("/Downloads", FileSpec::new("manual.pdf").with_size(1_048_576)),
        ("/", FileSpec::new(".profile").with_content("export PS1='$ '").hidden()),
    ]
}

impl FileSystemTree {
    /// Tree with the default user folders and a handful of sample files.
    pub fn seeded() -> Self {
        let mut tree = Self::new();
        for (parent, name) in SEED_FOLDERS {
            if let Err(err) = tree.create_folder(parent, name) {
                logging::warn!("skipping seed folder {parent}/{name}: {err}");
            }
        }
        for (parent, spec) in seed_files() {
            let name = spec.name.clone();
            if let Err(err) = tree.create_file(parent, spec) {
                logging::warn!("skipping seed file {parent}/{name}: {err}");
            }
        }
        if let Err(err) = tree.toggle_folder_expansion("/Documents") {
            logging::warn!("seed tree has no documents folder: {err}");
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_tree_has_default_folders_and_consistent_aggregates() {
        let tree = FileSystemTree::seeded();
        for path in ["/Documents", "/Pictures", "/Desktop", "/Downloads"] {
            assert!(tree.folder(path).is_some(), "{path} missing");
        }
        let pictures = tree.folder("/Pictures").expect("pictures");
        assert_eq!(pictures.item_count, 3);
        assert_eq!(pictures.total_size, 245_760 + 512_000 + 389_120);
        let sum: u64 = tree
            .root
            .children
            .values()
            .map(|item| item.aggregate_size())
            .sum();
        assert_eq!(tree.root.total_size, sum);
    }
}
