use super::{GenericContext, Member, ResolveError, Signature, SymbolResolver, Token};
use log::trace;
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

type MemberKey = (Token, Option<GenericContext>);

/// Memoizes another resolver's answers in bounded LRU caches.
///
/// Failures are passed through and never cached. The caches sit behind mutexes so one
/// resolver can serve parallel decodes.
pub struct CachedResolver<R> {
    inner: R,
    strings: Mutex<LruCache<Token, String>>,
    members: Mutex<LruCache<MemberKey, Member>>,
    signatures: Mutex<LruCache<Token, Signature>>,
}

impl<R: SymbolResolver> CachedResolver<R> {
    /// `capacity` bounds each of the three caches separately.
    pub fn new(inner: R, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            strings: Mutex::new(LruCache::new(capacity)),
            members: Mutex::new(LruCache::new(capacity)),
            signatures: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn clear(&self) {
        lock(&self.strings).clear();
        lock(&self.members).clear();
        lock(&self.signatures).clear();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn cached<K, V, F>(cache: &Mutex<LruCache<K, V>>, key: K, resolve: F) -> Result<V, ResolveError>
where
    K: Hash + Eq,
    V: Clone,
    F: FnOnce() -> Result<V, ResolveError>,
{
    if let Some(value) = lock(cache).get(&key) {
        return Ok(value.clone());
    }

    let value = resolve()?;
    lock(cache).put(key, value.clone());
    Ok(value)
}

impl<R: SymbolResolver> SymbolResolver for CachedResolver<R> {
    fn resolve_string(&self, token: Token) -> Result<String, ResolveError> {
        cached(&self.strings, token, || {
            trace!("string cache miss for {token}");
            self.inner.resolve_string(token)
        })
    }

    fn resolve_member(
        &self,
        token: Token,
        context: Option<&GenericContext>,
    ) -> Result<Member, ResolveError> {
        cached(&self.members, (token, context.cloned()), || {
            trace!("member cache miss for {token}");
            self.inner.resolve_member(token, context)
        })
    }

    fn resolve_signature(&self, token: Token) -> Result<Signature, ResolveError> {
        cached(&self.signatures, token, || {
            trace!("signature cache miss for {token}");
            self.inner.resolve_signature(token)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MemberKind, MetadataTable};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        table: MetadataTable,
        calls: AtomicUsize,
    }

    impl SymbolResolver for Counting {
        fn resolve_string(&self, token: Token) -> Result<String, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table.resolve_string(token)
        }

        fn resolve_member(
            &self,
            token: Token,
            context: Option<&GenericContext>,
        ) -> Result<Member, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table.resolve_member(token, context)
        }

        fn resolve_signature(&self, token: Token) -> Result<Signature, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table.resolve_signature(token)
        }
    }

    fn resolver(capacity: usize) -> CachedResolver<Counting> {
        let mut table = MetadataTable::new();
        table
            .add_string(Token(0x7000_0001), "a")
            .add_string(Token(0x7000_0002), "b")
            .add_member(Token(0x0A00_0001), Member::new(MemberKind::Type, "Box<!0>"));
        let inner = Counting {
            table,
            calls: AtomicUsize::new(0),
        };
        CachedResolver::new(inner, NonZeroUsize::new(capacity).unwrap())
    }

    fn calls(resolver: &CachedResolver<Counting>) -> usize {
        resolver.inner().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_repeated_lookups_hit_cache() {
        let resolver = resolver(4);
        assert_eq!(resolver.resolve_string(Token(0x7000_0001)).unwrap(), "a");
        assert_eq!(resolver.resolve_string(Token(0x7000_0001)).unwrap(), "a");
        assert_eq!(calls(&resolver), 1);
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let resolver = resolver(1);
        resolver.resolve_string(Token(0x7000_0001)).unwrap();
        resolver.resolve_string(Token(0x7000_0002)).unwrap();
        resolver.resolve_string(Token(0x7000_0001)).unwrap();
        assert_eq!(calls(&resolver), 3);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let resolver = resolver(4);
        assert!(resolver.resolve_string(Token(0x7000_0009)).is_err());
        assert!(resolver.resolve_string(Token(0x7000_0009)).is_err());
        assert_eq!(calls(&resolver), 2);
    }

    #[test]
    fn test_members_are_keyed_by_context() {
        let resolver = resolver(4);
        let strings = GenericContext {
            type_arguments: vec!["System.String".to_string()],
            method_arguments: Vec::new(),
        };
        let ints = GenericContext {
            type_arguments: vec!["System.Int32".to_string()],
            method_arguments: Vec::new(),
        };

        let token = Token(0x0A00_0001);
        assert_eq!(
            resolver.resolve_member(token, Some(&strings)).unwrap().name,
            "Box<System.String>"
        );
        assert_eq!(
            resolver.resolve_member(token, Some(&ints)).unwrap().name,
            "Box<System.Int32>"
        );
        resolver.resolve_member(token, Some(&strings)).unwrap();
        assert_eq!(calls(&resolver), 2);

        resolver.clear();
        resolver.resolve_member(token, Some(&strings)).unwrap();
        assert_eq!(calls(&resolver), 3);
    }
}
