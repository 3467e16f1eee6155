//! 메모리 상의 아카이브 트리
//!
//! 디렉토리 노드가 자식 id 목록을 소유하고, `parent`는 조회용 링크입니다.
//! 부모가 없는 루트 이외의 노드는 "분리된" 엔트리(클립보드 복제본 등)입니다.

use crate::models::download::{CancelSignal, ProgressSink};
use crate::models::entry::{Blob, EntryId};
use crate::system::zip_codec::{self, DecodedItem, ZipItem};
use crate::utils::error::{Result, ZipManagerError};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum NodeKind {
    Directory { children: Vec<EntryId> },
    File { data: Arc<[u8]> },
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<EntryId>,
    kind: NodeKind,
}

impl Node {
    fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }
}

/// 엔트리 트리
#[derive(Debug)]
pub struct ArchiveFs {
    nodes: HashMap<EntryId, Node>,
    root: EntryId,
    next_id: u64,
}

impl ArchiveFs {
    /// 빈 루트 디렉토리 하나로 생성
    pub fn new() -> Self {
        let root = EntryId::new(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                name: String::new(),
                parent: None,
                kind: NodeKind::Directory {
                    children: Vec::new(),
                },
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> EntryId {
        self.root
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn name(&self, id: EntryId) -> Option<&str> {
        self.nodes.get(&id).map(|node| node.name.as_str())
    }

    pub fn is_directory(&self, id: EntryId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_directory)
    }

    pub fn parent(&self, id: EntryId) -> Option<EntryId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// 디렉토리 자식 목록 (삽입 순서). 파일이거나 없으면 빈 슬라이스
    pub fn children(&self, id: EntryId) -> &[EntryId] {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::Directory { children }) => children,
            _ => &[],
        }
    }

    /// 파일 크기 (디렉토리면 None)
    pub fn file_size(&self, id: EntryId) -> Option<u64> {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::File { data }) => Some(data.len() as u64),
            _ => None,
        }
    }

    /// 트리에 붙어 있지 않은 엔트리 여부
    pub fn is_detached(&self, id: EntryId) -> bool {
        id != self.root && self.contains(id) && self.parent(id).is_none()
    }

    /// 루트부터 `id`까지의 경로 (경로 표시줄용)
    pub fn ancestors(&self, id: EntryId) -> Vec<EntryId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut chain = vec![id];
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain.reverse();
        chain
    }

    pub fn child_by_name(&self, folder: EntryId, name: &str) -> Option<EntryId> {
        self.children(folder)
            .iter()
            .copied()
            .find(|child| self.name(*child) == Some(name))
    }

    /// `entry`가 `ancestor`의 (엄격한) 하위 엔트리인지 확인
    pub fn is_descendant_of(&self, entry: EntryId, ancestor: EntryId) -> bool {
        let mut current = self.parent(entry);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// 전위 순회 id 목록 (자기 자신 포함)
    pub fn subtree(&self, id: EntryId) -> Vec<EntryId> {
        let mut collected = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            collected.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        collected
    }

    pub fn add_directory(&mut self, folder: EntryId, name: &str) -> Result<EntryId> {
        self.add_node(
            folder,
            name,
            NodeKind::Directory {
                children: Vec::new(),
            },
        )
    }

    pub fn add_blob(&mut self, folder: EntryId, name: &str, data: Vec<u8>) -> Result<EntryId> {
        self.add_node(
            folder,
            name,
            NodeKind::File {
                data: Arc::from(data),
            },
        )
    }

    pub fn rename(&mut self, id: EntryId, name: &str) -> Result<()> {
        if id == self.root {
            return Err(ZipManagerError::RootImmutable {
                operation: "renamed",
            });
        }
        validate_name(name)?;
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Some(existing) = self.child_by_name(parent, name) {
                if existing != id {
                    return Err(ZipManagerError::NameCollision {
                        name: name.to_string(),
                    });
                }
            }
        }
        self.node_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// 엔트리와 하위 엔트리 전체 삭제
    pub fn remove(&mut self, id: EntryId) -> Result<()> {
        if id == self.root {
            return Err(ZipManagerError::RootImmutable {
                operation: "removed",
            });
        }
        self.node(id)?;
        self.detach(id);
        self.drop_subtree(id);
        Ok(())
    }

    /// 분리된 엔트리 폐기. 트리에 붙어 있으면 아무것도 하지 않음
    pub fn discard(&mut self, id: EntryId) {
        if self.is_detached(id) {
            self.drop_subtree(id);
        }
    }

    /// 엔트리를 `target` 폴더로 이동
    pub fn move_entry(&mut self, entry: EntryId, target: EntryId) -> Result<()> {
        if entry == self.root {
            return Err(ZipManagerError::RootImmutable { operation: "moved" });
        }
        let name = self.node(entry)?.name.clone();
        if !self.node(target)?.is_directory() {
            return Err(ZipManagerError::NotADirectory);
        }
        if target == entry || self.is_descendant_of(target, entry) {
            return Err(ZipManagerError::MoveIntoDescendant);
        }
        if self.child_by_name(target, &name).is_some() {
            return Err(ZipManagerError::NameCollision { name });
        }

        self.detach(entry);
        self.node_mut(entry)?.parent = Some(target);
        if let NodeKind::Directory { children } = &mut self.node_mut(target)?.kind {
            children.push(entry);
        }
        Ok(())
    }

    /// 분리된 복제본 생성 (`deep`이면 하위 엔트리까지)
    pub fn clone_entry(&mut self, id: EntryId, deep: bool) -> Result<EntryId> {
        let source = self.node(id)?.clone();
        let kind = match &source.kind {
            NodeKind::File { data } => NodeKind::File {
                data: Arc::clone(data),
            },
            NodeKind::Directory { .. } => NodeKind::Directory {
                children: Vec::new(),
            },
        };
        let clone = self.allocate(Node {
            name: source.name,
            parent: None,
            kind,
        });

        if deep {
            if let NodeKind::Directory { children } = source.kind {
                for child in children {
                    let child_clone = self.clone_entry(child, true)?;
                    self.node_mut(child_clone)?.parent = Some(clone);
                    if let NodeKind::Directory { children } = &mut self.node_mut(clone)?.kind {
                        children.push(child_clone);
                    }
                }
            }
        }
        Ok(clone)
    }

    /// `folder` 안에서 사용 가능한 이름 (`name`, `stem_(1).ext`, ...)
    pub fn unique_child_name(&self, folder: EntryId, name: &str) -> String {
        let (stem, extension) = match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], Some(&name[dot + 1..])),
            _ => (name, None),
        };
        let make_name = |index: usize| -> String {
            let base = if index == 0 {
                stem.to_string()
            } else {
                format!("{}_({})", stem, index)
            };
            match extension {
                Some(ext) if !ext.is_empty() => format!("{}.{}", base, ext),
                _ => base,
            }
        };

        let mut index = 0usize;
        loop {
            let candidate = make_name(index);
            if self.child_by_name(folder, &candidate).is_none() {
                return candidate;
            }
            index += 1;
        }
    }

    /// 압축 파일 내용을 `folder`에 병합
    ///
    /// 같은 이름의 디렉토리는 재사용하고, 파일 이름 충돌은 에러입니다.
    /// 반환값은 추가된 엔트리 수입니다.
    pub async fn import_blob(&mut self, folder: EntryId, data: Vec<u8>) -> Result<usize> {
        if !self.node(folder)?.is_directory() {
            return Err(ZipManagerError::NotADirectory);
        }
        let items = tokio::task::spawn_blocking(move || zip_codec::decode(&data))
            .await
            .map_err(|e| ZipManagerError::Io(io::Error::other(e)))??;

        let mut added = 0usize;
        for item in items {
            added += self.merge_item(folder, item)?;
        }
        tracing::debug!(folder = %folder, added, "archive imported");
        Ok(added)
    }

    /// 내보내기 작업 준비 (디렉토리면 자식들, 파일이면 자기 자신을 담은 zip)
    pub fn export_job(&self, id: EntryId, mime_type: &str) -> Result<ExportJob> {
        let node = self.node(id)?;
        let mut items = Vec::new();
        if node.is_directory() {
            for child in self.children(id) {
                self.collect_zip_items(*child, "", &mut items)?;
            }
        } else {
            self.collect_zip_items(id, "", &mut items)?;
        }
        Ok(ExportJob {
            items,
            mime_type: mime_type.to_string(),
        })
    }

    /// 파일 내용 다운로드 작업 준비
    pub fn blob_job(&self, id: EntryId, mime_type: &str) -> Result<FileJob> {
        match &self.node(id)?.kind {
            NodeKind::File { data } => Ok(FileJob {
                data: Arc::clone(data),
                mime_type: mime_type.to_string(),
            }),
            NodeKind::Directory { .. } => Err(ZipManagerError::NotAFile),
        }
    }

    fn node(&self, id: EntryId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(ZipManagerError::EntryNotFound)
    }

    fn node_mut(&mut self, id: EntryId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(ZipManagerError::EntryNotFound)
    }

    fn allocate(&mut self, node: Node) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn add_node(&mut self, folder: EntryId, name: &str, kind: NodeKind) -> Result<EntryId> {
        validate_name(name)?;
        if !self.node(folder)?.is_directory() {
            return Err(ZipManagerError::NotADirectory);
        }
        if self.child_by_name(folder, name).is_some() {
            return Err(ZipManagerError::NameCollision {
                name: name.to_string(),
            });
        }
        let id = self.allocate(Node {
            name: name.to_string(),
            parent: Some(folder),
            kind,
        });
        if let NodeKind::Directory { children } = &mut self.node_mut(folder)?.kind {
            children.push(id);
        }
        Ok(id)
    }

    fn detach(&mut self, id: EntryId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(Node {
            kind: NodeKind::Directory { children },
            ..
        }) = self.nodes.get_mut(&parent)
        {
            children.retain(|child| *child != id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
    }

    fn drop_subtree(&mut self, id: EntryId) {
        for doomed in self.subtree(id) {
            self.nodes.remove(&doomed);
        }
    }

    fn merge_item(&mut self, folder: EntryId, item: DecodedItem) -> Result<usize> {
        let DecodedItem { mut segments, data } = item;
        let Some(leaf) = segments.pop() else {
            return Ok(0);
        };

        let mut added = 0usize;
        let mut current = folder;
        for segment in segments {
            let (dir, created) = self.ensure_directory(current, &segment)?;
            current = dir;
            added += usize::from(created);
        }

        match data {
            Some(bytes) => {
                self.add_blob(current, &leaf, bytes)?;
                added += 1;
            }
            None => {
                let (_, created) = self.ensure_directory(current, &leaf)?;
                added += usize::from(created);
            }
        }
        Ok(added)
    }

    fn ensure_directory(&mut self, folder: EntryId, name: &str) -> Result<(EntryId, bool)> {
        match self.child_by_name(folder, name) {
            Some(existing) if self.is_directory(existing) => Ok((existing, false)),
            Some(_) => Err(ZipManagerError::NameCollision {
                name: name.to_string(),
            }),
            None => Ok((self.add_directory(folder, name)?, true)),
        }
    }

    fn collect_zip_items(&self, id: EntryId, prefix: &str, items: &mut Vec<ZipItem>) -> Result<()> {
        let node = self.node(id)?;
        let path = format!("{}{}", prefix, node.name);
        match &node.kind {
            NodeKind::File { data } => items.push(ZipItem {
                path,
                data: Some(Arc::clone(data)),
            }),
            NodeKind::Directory { children } => {
                let dir_path = format!("{}/", path);
                items.push(ZipItem {
                    path: dir_path.clone(),
                    data: None,
                });
                for child in children {
                    self.collect_zip_items(*child, &dir_path, items)?;
                }
            }
        }
        Ok(())
    }
}

impl Default for ArchiveFs {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ZipManagerError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// 폴더(또는 단일 엔트리) zip 내보내기 작업
///
/// 트리의 스냅샷을 소유하므로 이후 트리 변경과 무관합니다.
#[derive(Debug, Clone)]
pub struct ExportJob {
    items: Vec<ZipItem>,
    mime_type: String,
}

impl ExportJob {
    pub async fn run(self, signal: CancelSignal, progress: ProgressSink) -> Result<Blob> {
        let ExportJob { items, mime_type } = self;
        let data =
            tokio::task::spawn_blocking(move || zip_codec::encode(&items, &signal, &progress))
                .await
                .map_err(|e| ZipManagerError::Io(io::Error::other(e)))??;
        Ok(Blob::new(data, mime_type))
    }
}

/// 단일 파일 내용 다운로드 작업
#[derive(Debug, Clone)]
pub struct FileJob {
    data: Arc<[u8]>,
    mime_type: String,
}

impl FileJob {
    pub async fn run(self, signal: CancelSignal, progress: ProgressSink) -> Result<Blob> {
        signal.check()?;
        let total = self.data.len() as u64;
        progress.report(Some(total), Some(total));
        Ok(Blob::new(self.data.to_vec(), self.mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ArchiveFs, EntryId, EntryId, EntryId) {
        // root/{docs/{a.txt}, b.txt}
        let mut fs = ArchiveFs::new();
        let root = fs.root();
        let docs = fs.add_directory(root, "docs").unwrap();
        let a = fs.add_blob(docs, "a.txt", b"alpha".to_vec()).unwrap();
        fs.add_blob(root, "b.txt", b"beta".to_vec()).unwrap();
        (fs, docs, a, root)
    }

    #[test]
    fn test_add_and_lookup() {
        let (fs, docs, a, root) = sample();
        assert_eq!(fs.children(root).len(), 2);
        assert_eq!(fs.child_by_name(docs, "a.txt"), Some(a));
        assert_eq!(fs.parent(a), Some(docs));
        assert!(fs.is_directory(docs));
        assert_eq!(fs.file_size(a), Some(5));
        assert_eq!(fs.ancestors(a), vec![root, docs, a]);
    }

    #[test]
    fn test_add_rejects_collision_and_invalid_names() {
        let (mut fs, docs, _, root) = sample();
        assert!(matches!(
            fs.add_directory(root, "docs"),
            Err(ZipManagerError::NameCollision { .. })
        ));
        assert!(matches!(
            fs.add_blob(docs, "", Vec::new()),
            Err(ZipManagerError::InvalidName { .. })
        ));
        assert!(matches!(
            fs.add_directory(root, "x/y"),
            Err(ZipManagerError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_rename_checks_siblings_only() {
        let (mut fs, docs, a, root) = sample();
        assert!(fs.rename(docs, "b.txt").is_err());
        fs.rename(a, "b.txt").unwrap();
        assert_eq!(fs.name(a), Some("b.txt"));
        fs.rename(a, "b.txt").unwrap();
        assert!(fs.rename(root, "x").is_err());
    }

    #[test]
    fn test_move_rejects_cycles_and_collisions() {
        let (mut fs, docs, a, root) = sample();
        let inner = fs.add_directory(docs, "inner").unwrap();

        assert!(matches!(
            fs.move_entry(docs, inner),
            Err(ZipManagerError::MoveIntoDescendant)
        ));
        assert!(matches!(
            fs.move_entry(docs, docs),
            Err(ZipManagerError::MoveIntoDescendant)
        ));
        assert!(matches!(
            fs.move_entry(a, docs),
            Err(ZipManagerError::NameCollision { .. })
        ));
        assert!(matches!(
            fs.move_entry(docs, a),
            Err(ZipManagerError::NotADirectory)
        ));
        assert!(fs.move_entry(root, docs).is_err());

        fs.move_entry(a, inner).unwrap();
        assert_eq!(fs.parent(a), Some(inner));
        assert!(!fs.children(docs).contains(&a));
        assert!(fs.is_descendant_of(a, docs));
    }

    #[test]
    fn test_deep_clone_is_detached_and_independent() {
        let (mut fs, docs, a, _) = sample();
        let clone = fs.clone_entry(docs, true).unwrap();

        assert_ne!(clone, docs);
        assert!(fs.is_detached(clone));
        let cloned_children = fs.children(clone).to_vec();
        assert_eq!(cloned_children.len(), 1);
        assert_ne!(cloned_children[0], a);
        assert_eq!(fs.name(cloned_children[0]), Some("a.txt"));

        fs.rename(a, "changed.txt").unwrap();
        assert_eq!(fs.name(cloned_children[0]), Some("a.txt"));
    }

    #[test]
    fn test_shallow_clone_skips_children() {
        let (mut fs, docs, _, _) = sample();
        let clone = fs.clone_entry(docs, false).unwrap();
        assert!(fs.is_directory(clone));
        assert!(fs.children(clone).is_empty());
    }

    #[test]
    fn test_remove_drops_subtree() {
        let (mut fs, docs, a, root) = sample();
        fs.remove(docs).unwrap();
        assert!(!fs.contains(docs));
        assert!(!fs.contains(a));
        assert_eq!(fs.children(root).len(), 1);
        assert!(fs.remove(root).is_err());
        assert!(matches!(
            fs.remove(docs),
            Err(ZipManagerError::EntryNotFound)
        ));
    }

    #[test]
    fn test_discard_only_affects_detached_entries() {
        let (mut fs, docs, _, _) = sample();
        let clone = fs.clone_entry(docs, true).unwrap();
        fs.discard(docs);
        assert!(fs.contains(docs));
        fs.discard(clone);
        assert!(!fs.contains(clone));
    }

    #[test]
    fn test_unique_child_name() {
        let (mut fs, _, _, root) = sample();
        assert_eq!(fs.unique_child_name(root, "c.txt"), "c.txt");
        assert_eq!(fs.unique_child_name(root, "b.txt"), "b_(1).txt");
        fs.add_blob(root, "b_(1).txt", Vec::new()).unwrap();
        assert_eq!(fs.unique_child_name(root, "b.txt"), "b_(2).txt");
        assert_eq!(fs.unique_child_name(root, "docs"), "docs_(1)");
    }

    #[tokio::test]
    async fn test_export_then_import_into_other_folder() {
        let (fs, _, _, root) = sample();
        let job = fs.export_job(root, "application/zip").unwrap();
        let (signal, progress) = crate::models::download::detached_task_handles();
        let blob = job.run(signal, progress).await.unwrap();
        assert_eq!(blob.mime_type, "application/zip");

        let mut other = ArchiveFs::new();
        let target = other.add_directory(other.root(), "restored").unwrap();
        let added = other.import_blob(target, blob.data).await.unwrap();
        assert_eq!(added, 3);

        let restored_docs = other.child_by_name(target, "docs").unwrap();
        assert!(other.is_directory(restored_docs));
        assert!(other.child_by_name(restored_docs, "a.txt").is_some());
        assert_eq!(
            other
                .child_by_name(target, "b.txt")
                .and_then(|b| other.file_size(b)),
            Some(4)
        );
    }

    #[tokio::test]
    async fn test_import_merges_directories_and_rejects_file_collision() {
        let (fs, docs, _, _) = sample();
        let (signal, progress) = crate::models::download::detached_task_handles();
        let blob = fs
            .export_job(docs, "application/zip")
            .unwrap()
            .run(signal, progress)
            .await
            .unwrap();

        let mut target = ArchiveFs::new();
        let root = target.root();
        let added = target.import_blob(root, blob.data.clone()).await.unwrap();
        assert_eq!(added, 1);

        let err = target.import_blob(root, blob.data).await.unwrap_err();
        assert!(matches!(err, ZipManagerError::NameCollision { .. }));
    }

    #[tokio::test]
    async fn test_import_rejects_garbage() {
        let mut fs = ArchiveFs::new();
        let root = fs.root();
        let err = fs.import_blob(root, vec![b'x'; 256]).await.unwrap_err();
        assert!(matches!(err, ZipManagerError::Archive(_)));
    }

    #[tokio::test]
    async fn test_export_observes_cancellation() {
        let (fs, _, _, root) = sample();
        let (signal, progress) = crate::models::download::detached_task_handles();
        signal.cancel();
        let err = fs
            .export_job(root, "application/zip")
            .unwrap()
            .run(signal, progress)
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
    }

    #[tokio::test]
    async fn test_file_job_returns_content() {
        let (fs, _, a, _) = sample();
        let (signal, progress) = crate::models::download::detached_task_handles();
        let blob = fs
            .blob_job(a, "text/plain")
            .unwrap()
            .run(signal, progress)
            .await
            .unwrap();
        assert_eq!(blob.data, b"alpha");
        assert_eq!(blob.mime_type, "text/plain");
    }
}
