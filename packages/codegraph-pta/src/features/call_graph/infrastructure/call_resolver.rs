//! Call resolution
//!
//! - STATIC: method declared in the referenced class
//! - SPECIAL: dispatch from the referenced class
//! - VIRTUAL / INTERFACE: dispatch from the receiver's class when known,
//!   otherwise every target found by a CHA walk below the referenced class
//!
//! Dispatch walks up the superclass chain and returns the first declared,
//! non-abstract method with the wanted subsignature. A failed lookup is not an
//! error: the call simply has no target.

use crate::shared::models::{CallKind, ClassId, Invoke, MethodId, Subsignature, Type};
use crate::shared::ports::ClassHierarchy;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub struct CallResolver<'h, H: ClassHierarchy + ?Sized> {
    hierarchy: &'h H,
}

impl<'h, H: ClassHierarchy + ?Sized> CallResolver<'h, H> {
    pub fn new(hierarchy: &'h H) -> Self {
        Self { hierarchy }
    }

    /// First non-abstract method with `subsignature` in `class` or its superclasses
    pub fn dispatch(&self, class: ClassId, subsignature: &Subsignature) -> Option<MethodId> {
        let mut current = Some(class);
        while let Some(c) = current {
            if let Some(method) = self.hierarchy.declared_method(c, subsignature) {
                if !self.hierarchy.is_abstract_method(method) {
                    return Some(method);
                }
            }
            current = self.hierarchy.super_class_of(c);
        }
        None
    }

    /// Resolve one target; `receiver_type` is the receiver object's type when known
    pub fn resolve_callee(&self, receiver_type: Option<&Type>, invoke: &Invoke) -> Option<MethodId> {
        let method_ref = &invoke.method_ref;
        match invoke.kind {
            CallKind::Static => self
                .hierarchy
                .declared_method(method_ref.declaring_class, &method_ref.subsignature),
            CallKind::Special => self.dispatch(method_ref.declaring_class, &method_ref.subsignature),
            CallKind::Virtual | CallKind::Interface => {
                // Arrays and primitives dispatch from the referenced class
                let class = receiver_type
                    .and_then(Type::class)
                    .unwrap_or(method_ref.declaring_class);
                self.dispatch(class, &method_ref.subsignature)
            }
        }
    }

    /// All possible targets by class hierarchy analysis
    pub fn resolve_cha(&self, invoke: &Invoke) -> Vec<MethodId> {
        match invoke.kind {
            CallKind::Static | CallKind::Special => {
                self.resolve_callee(None, invoke).into_iter().collect()
            }
            CallKind::Virtual | CallKind::Interface => self.resolve_hierarchy(
                invoke.method_ref.declaring_class,
                &invoke.method_ref.subsignature,
            ),
        }
    }

    fn resolve_hierarchy(&self, root: ClassId, subsignature: &Subsignature) -> Vec<MethodId> {
        let mut targets = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([root]);

        while let Some(class) = queue.pop_front() {
            if !visited.insert(class) {
                continue;
            }
            if let Some(target) = self.dispatch(class, subsignature) {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
            if self.hierarchy.is_interface(class) {
                queue.extend(self.hierarchy.direct_subinterfaces_of(class));
                queue.extend(self.hierarchy.direct_implementors_of(class));
            } else {
                queue.extend(self.hierarchy.direct_subclasses_of(class));
            }
        }

        targets
    }
}
