//! File storage accounting and folder navigation

use crate::dataset::{Dataset, FileCategory, FileMetadata, Folder};
use crate::error::{AppError, EntityKind, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

pub fn total_storage(files: &[FileMetadata]) -> u64 {
    files.iter().map(|f| f.size).sum()
}

/// Storage used by one file category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStorage {
    pub category: FileCategory,
    pub bytes: u64,
    pub files: usize,
}

/// Per-category usage, largest first. Categories without files are omitted.
pub fn storage_by_category(files: &[FileMetadata]) -> Vec<CategoryStorage> {
    let mut totals: BTreeMap<FileCategory, (u64, usize)> = BTreeMap::new();
    for file in files {
        let entry = totals.entry(file.category).or_default();
        entry.0 += file.size;
        entry.1 += 1;
    }

    let mut rows: Vec<CategoryStorage> = totals
        .into_iter()
        .map(|(category, (bytes, files))| CategoryStorage {
            category,
            bytes,
            files,
        })
        .collect();
    rows.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    rows
}

pub fn starred_files(dataset: &Dataset) -> Vec<&FileMetadata> {
    dataset.files.iter().filter(|f| f.is_starred).collect()
}

/// Folders from the root down to `folder_id`, inclusive.
///
/// Walking stops at a parent id that does not resolve or at a folder
/// already on the path, so a malformed tree cannot loop.
pub fn breadcrumbs<'a>(dataset: &'a Dataset, folder_id: &str) -> Vec<&'a Folder> {
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(folder_id);

    while let Some(id) = current {
        if !seen.insert(id) {
            tracing::warn!("Folder cycle detected at {}", id);
            break;
        }
        let Some(folder) = dataset.folder(id) else {
            tracing::warn!("Skipping unresolved folder reference: {}", id);
            break;
        };
        path.push(folder);
        current = folder.parent_id.as_deref();
    }

    path.reverse();
    path
}

/// Bytes stored in a folder and all of its descendants
pub fn folder_size(dataset: &Dataset, folder_id: &str) -> u64 {
    let mut seen = HashSet::new();
    let mut stack = vec![folder_id];
    let mut bytes = 0;

    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        bytes += dataset
            .files_in_folder(Some(id))
            .iter()
            .map(|f| f.size)
            .sum::<u64>();
        stack.extend(
            dataset
                .child_folders(Some(id))
                .into_iter()
                .map(|f| f.id.as_str()),
        );
    }

    bytes
}

/// What the file browser shows for one location
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderContents<'a> {
    /// `None` at the root
    pub folder: Option<&'a Folder>,
    pub path: Vec<&'a Folder>,
    pub folders: Vec<&'a Folder>,
    pub files: Vec<&'a FileMetadata>,
}

/// Open a folder, or the root when `folder_id` is `None`
pub fn folder_contents<'a>(
    dataset: &'a Dataset,
    folder_id: Option<&str>,
) -> Result<FolderContents<'a>> {
    let folder = match folder_id {
        Some(id) => Some(
            dataset
                .folder(id)
                .ok_or_else(|| AppError::not_found(EntityKind::Folder, id))?,
        ),
        None => None,
    };

    Ok(FolderContents {
        folder,
        path: folder_id.map(|id| breadcrumbs(dataset, id)).unwrap_or_default(),
        folders: dataset.child_folders(folder_id),
        files: dataset.files_in_folder(folder_id),
    })
}
