//! Type tokens for views and view-models
//!
//! A kind is resolved once, when a view/view-model pair is registered. It
//! carries the `TypeId` used for identity, a short type name for logs and
//! errors, and a monomorphized constructor so the factory never needs to
//! know the concrete type again.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::page::{Page, PageConstruct, PageContext};
use super::view_model::{ViewModel, ViewModelConstruct};

/// Identity of a concrete type, compared by `TypeId` only
#[derive(Clone, Copy)]
pub struct Kind {
    id: TypeId,
    name: &'static str,
}

impl Kind {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name without its module path
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

type PageCtor = fn(&PageContext<'_>) -> anyhow::Result<Arc<dyn Page>>;
type ViewModelCtor = fn() -> anyhow::Result<Arc<dyn ViewModel>>;

/// Token for a view (page) type
#[derive(Clone, Copy)]
pub struct ViewKind {
    kind: Kind,
    construct: PageCtor,
}

impl ViewKind {
    pub fn of<V: PageConstruct>() -> Self {
        Self {
            kind: Kind::of::<V>(),
            construct: construct_page::<V>,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    pub(crate) fn construct(&self, ctx: &PageContext<'_>) -> anyhow::Result<Arc<dyn Page>> {
        (self.construct)(ctx)
    }
}

fn construct_page<V: PageConstruct>(ctx: &PageContext<'_>) -> anyhow::Result<Arc<dyn Page>> {
    let page: Arc<dyn Page> = Arc::new(V::construct(ctx)?);
    Ok(page)
}

/// Token for a view-model type
#[derive(Clone, Copy)]
pub struct ViewModelKind {
    kind: Kind,
    construct: ViewModelCtor,
}

impl ViewModelKind {
    pub fn of<VM: ViewModelConstruct>() -> Self {
        Self {
            kind: Kind::of::<VM>(),
            construct: construct_view_model::<VM>,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    pub(crate) fn construct(&self) -> anyhow::Result<Arc<dyn ViewModel>> {
        (self.construct)()
    }
}

fn construct_view_model<VM: ViewModelConstruct>() -> anyhow::Result<Arc<dyn ViewModel>> {
    let view_model: Arc<dyn ViewModel> = Arc::new(VM::construct()?);
    Ok(view_model)
}

macro_rules! kind_identity {
    ($token:ty) => {
        impl PartialEq for $token {
            fn eq(&self, other: &Self) -> bool {
                self.kind == other.kind
            }
        }

        impl Eq for $token {}

        impl Hash for $token {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.kind.hash(state);
            }
        }

        impl fmt::Debug for $token {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($token), self.kind.name)
            }
        }

        impl fmt::Display for $token {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.kind.name)
            }
        }
    };
}

kind_identity!(ViewKind);
kind_identity!(ViewModelKind);

#[cfg(test)]
mod tests {
    use super::*;

    struct HomePage;
    struct Wrapper<T>(T);

    #[test]
    fn test_kind_identity_and_name() {
        assert_eq!(Kind::of::<HomePage>(), Kind::of::<HomePage>());
        assert_ne!(Kind::of::<HomePage>(), Kind::of::<String>());
        assert_eq!(Kind::of::<HomePage>().name(), "HomePage");
    }

    #[test]
    fn test_generic_type_name_is_shortened() {
        assert_eq!(Kind::of::<Wrapper<HomePage>>().name(), "Wrapper");
        assert_eq!(Kind::of::<u32>().name(), "u32");
    }
}
