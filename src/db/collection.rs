// src/db/collection.rs

use std::collections::HashMap;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    db::backend::{CollectionBackend, CollectionName},
};

/// Um registro com chave natural (celular do cliente, número da fatura).
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Campo JSON que guarda a chave. Usado também nos registros que não
    /// puderam ser lidos.
    const KEY_FIELD: &'static str;

    /// `None` para registros antigos sem chave: ficam na lista, fora do índice.
    fn key(&self) -> Option<&str>;

    /// Ajustes aplicados a cada registro lido do backend.
    fn normalize(&mut self) {}
}

// Registro que não bate com o tipo fica guardado como veio e é regravado igual
#[derive(Debug, Clone)]
enum Entry<T> {
    Typed(T),
    Raw { key: Option<String>, value: Value },
}

impl<T: Record> Entry<T> {
    fn key(&self) -> Option<&str> {
        match self {
            Entry::Typed(record) => record.key(),
            Entry::Raw { key, .. } => key.as_deref(),
        }
    }
}

fn raw_key(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Lista ordenada + índice pela chave natural.
///
/// Se a coleção tiver chaves repetidas, o índice aponta para a primeira.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    entries: Vec<Entry<T>>,
    index: HashMap<String, usize>,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Record> Collection<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self::from_entries(records.into_iter().map(Entry::Typed).collect())
    }

    fn from_entries(entries: Vec<Entry<T>>) -> Self {
        let mut collection = Self {
            entries,
            index: HashMap::new(),
        };
        collection.reindex();
        collection
    }

    /// Converte os valores do backend. Entradas que não são registros
    /// válidos continuam na coleção sem alteração, mas não podem ser editadas.
    pub fn from_values(name: CollectionName, values: Vec<Value>) -> Self {
        let mut entries = Vec::with_capacity(values.len());
        for (position, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(mut record) => {
                    record.normalize();
                    entries.push(Entry::Typed(record));
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Registro {} de {} ilegível, mantido como está: {}",
                        position,
                        name,
                        e
                    );
                    entries.push(Entry::Raw {
                        key: raw_key(&value, T::KEY_FIELD),
                        value,
                    });
                }
            }
        }
        Self::from_entries(entries)
    }

    pub fn to_values(&self) -> Result<Vec<Value>, AppError> {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Typed(record) => serde_json::to_value(record).map_err(AppError::from),
                Entry::Raw { value, .. } => Ok(value.clone()),
            })
            .collect()
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, entry) in self.entries.iter().enumerate() {
            let Some(key) = entry.key() else { continue };
            if self.index.contains_key(key) {
                tracing::warn!("⚠️ Chave duplicada na coleção: {}", key);
                continue;
            }
            self.index.insert(key.to_string(), position);
        }
    }

    /// Total de entradas, incluindo as ilegíveis.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Só os registros tipados, na ordem.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Typed(record) => Some(record),
            Entry::Raw { .. } => None,
        })
    }

    /// Chaves de todas as entradas, inclusive as ilegíveis.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(Entry::key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Altera o registro da chave. Se a closure mudar a chave, o índice é refeito.
    ///
    /// `None` se a chave não existe. Registro ilegível dá `MalformedRecord`.
    pub fn update<R>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut T) -> Result<R, AppError>,
    ) -> Option<Result<R, AppError>> {
        let position = *self.index.get(key)?;
        let Entry::Typed(record) = &mut self.entries[position] else {
            return Some(Err(AppError::MalformedRecord(key.to_string())));
        };
        let result = f(record);
        if record.key() != Some(key) {
            self.reindex();
        }
        Some(result)
    }

    pub fn push(&mut self, record: T) {
        if let Some(key) = record.key() {
            if !self.index.contains_key(key) {
                self.index.insert(key.to_string(), self.entries.len());
            }
        }
        self.entries.push(Entry::Typed(record));
    }

    /// Remove todas as entradas com a chave. Retorna quantas saíram.
    pub fn remove(&mut self, key: &str) -> usize {
        if !self.index.contains_key(key) {
            return 0;
        }
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key() != Some(key));
        self.reindex();
        before - self.entries.len()
    }
}

/// Dono de uma coleção em memória, gravando no backend a cada alteração.
///
/// As escritas passam pelo write lock: a closure altera um rascunho, o
/// rascunho é salvo e só então substitui o estado. Se o `save` falhar, nada
/// muda em memória.
pub struct CollectionRepository<T> {
    name: CollectionName,
    backend: Arc<dyn CollectionBackend>,
    state: Arc<RwLock<Collection<T>>>,
}

impl<T> Clone for CollectionRepository<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            backend: self.backend.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Record> CollectionRepository<T> {
    pub async fn load(
        name: CollectionName,
        backend: Arc<dyn CollectionBackend>,
    ) -> Result<Self, AppError> {
        let values = backend.load(name).await?;
        let collection = Collection::from_values(name, values);
        if collection.is_empty() {
            tracing::info!("✅ Coleção de {} vazia", name);
        } else {
            tracing::info!("✅ {} {} carregados", collection.len(), name);
        }

        Ok(Self {
            name,
            backend,
            state: Arc::new(RwLock::new(collection)),
        })
    }

    pub async fn read<R>(&self, f: impl FnOnce(&Collection<T>) -> R) -> R {
        let guard = self.state.read().await;
        f(&guard)
    }

    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Collection<T>) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut guard = self.state.write().await;

        let mut draft = guard.clone();
        let result = f(&mut draft)?;

        let values = draft.to_values()?;
        self.backend.save(self.name, &values).await?;

        *guard = draft;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory::InMemoryBackend;
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        qty: u32,
    }

    impl Record for Item {
        const KEY_FIELD: &'static str = "code";

        fn key(&self) -> Option<&str> {
            self.code.as_deref()
        }
    }

    // Quantidade do primeiro registro com a chave
    fn qty(c: &Collection<Item>, code: &str) -> Option<u32> {
        c.iter().find(|i| i.key() == Some(code)).map(|i| i.qty)
    }

    fn item(code: &str, qty: u32) -> Item {
        Item {
            code: Some(code.to_string()),
            qty,
        }
    }

    #[test]
    fn first_duplicate_wins_lookups() {
        let c = Collection::new(vec![item("a", 1), item("b", 2), item("a", 3)]);
        assert_eq!(c.len(), 3);
        let mut c = c;
        assert_eq!(c.update("a", |i| Ok(i.qty)).unwrap().unwrap(), 1);
    }

    #[test]
    fn keyless_records_are_kept_but_not_indexed() {
        let mut c = Collection::new(vec![Item { code: None, qty: 9 }]);
        c.push(item("x", 1));
        assert_eq!(c.len(), 2);
        assert!(c.contains_key("x"));
        assert_eq!(c.iter().next().map(|i| i.qty), Some(9));
    }

    #[test]
    fn remove_drops_every_record_with_the_key() {
        let mut c = Collection::new(vec![item("a", 1), item("b", 2), item("a", 3)]);
        assert_eq!(c.remove("a"), 2);
        assert_eq!(c.len(), 1);
        assert_eq!(qty(&c, "b"), Some(2));
        assert_eq!(c.remove("zzz"), 0);
    }

    #[test]
    fn update_reindexes_when_key_changes() {
        let mut c = Collection::new(vec![item("a", 1), item("b", 2)]);
        c.update("a", |i| {
            i.code = Some("c".into());
            Ok(())
        })
        .unwrap()
        .unwrap();
        assert!(!c.contains_key("a"));
        assert_eq!(qty(&c, "c"), Some(1));
        assert!(c.update("missing", |i| {
            i.qty = 0;
            Ok(())
        })
        .is_none());
    }

    #[test]
    fn unreadable_values_are_kept_verbatim() {
        let values = vec![
            json!({"code": "a"}),
            json!(42),
            json!({"code": "b", "qty": "many"}),
        ];
        let c: Collection<Item> = Collection::from_values(CollectionName::Clients, values);

        assert_eq!(c.len(), 3);
        assert_eq!(c.iter().count(), 1);
        assert!(c.contains_key("b"));
        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            c.to_values().unwrap(),
            vec![json!({"code": "a", "qty": 0}), json!(42), json!({"code": "b", "qty": "many"})]
        );
    }

    #[test]
    fn unreadable_records_cannot_be_updated_but_can_be_removed() {
        let mut c: Collection<Item> = Collection::from_values(
            CollectionName::Clients,
            vec![json!({"code": "b", "qty": "many"}), json!({"code": 7, "qty": -1})],
        );

        let result = c.update("b", |i| Ok(i.qty));
        assert!(matches!(result, Some(Err(AppError::MalformedRecord(k))) if k == "b"));

        assert_eq!(c.remove("7"), 1);
        assert_eq!(c.len(), 1);
    }

    #[tokio::test]
    async fn writes_keep_unreadable_records_in_place() {
        let seed = vec![
            json!({"code": "a", "qty": "many"}),
            json!({"code": "b", "qty": 2}),
        ];
        let backend = Arc::new(InMemoryBackend::with_records(CollectionName::Clients, seed));
        let repo: CollectionRepository<Item> =
            CollectionRepository::load(CollectionName::Clients, backend.clone())
                .await
                .unwrap();

        repo.mutate(|c| {
            c.push(item("c", 3));
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            backend.snapshot(CollectionName::Clients),
            vec![
                json!({"code": "a", "qty": "many"}),
                json!({"code": "b", "qty": 2}),
                json!({"code": "c", "qty": 3}),
            ]
        );
    }

    #[tokio::test]
    async fn mutate_persists_the_whole_collection() {
        let backend = Arc::new(InMemoryBackend::new());
        let repo: CollectionRepository<Item> =
            CollectionRepository::load(CollectionName::Clients, backend.clone())
                .await
                .unwrap();

        repo.mutate(|c| {
            c.push(item("a", 1));
            c.push(item("b", 2));
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            backend.snapshot(CollectionName::Clients),
            vec![json!({"code": "a", "qty": 1}), json!({"code": "b", "qty": 2})]
        );
    }

    #[tokio::test]
    async fn failed_closure_leaves_state_untouched() {
        let backend = Arc::new(InMemoryBackend::new());
        let repo: CollectionRepository<Item> =
            CollectionRepository::load(CollectionName::Clients, backend.clone())
                .await
                .unwrap();

        let result: Result<(), AppError> = repo
            .mutate(|c| {
                c.push(item("a", 1));
                Err(AppError::InvalidInput("no".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(repo.read(|c| c.len()).await, 0);
        assert!(backend.snapshot(CollectionName::Clients).is_empty());
    }

    struct BrokenBackend;

    #[async_trait]
    impl CollectionBackend for BrokenBackend {
        async fn load(&self, _: CollectionName) -> Result<Vec<Value>, AppError> {
            Ok(vec![json!({"code": "a", "qty": 1})])
        }

        async fn save(&self, _: CollectionName, _: &[Value]) -> Result<(), AppError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[tokio::test]
    async fn failed_save_leaves_state_untouched() {
        let repo: CollectionRepository<Item> =
            CollectionRepository::load(CollectionName::Clients, Arc::new(BrokenBackend))
                .await
                .unwrap();

        let result = repo
            .mutate(|c| {
                c.remove("a");
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::StorageError(_))));
        assert!(repo.read(|c| c.contains_key("a")).await);
    }
}
