//! Ports - interfaces the analyses consume
//!
//! Call resolution only needs a class hierarchy view. [`Program`] provides
//! one directly; tests can substitute any other implementation.

use crate::shared::models::{ClassId, MethodId, Program, Subsignature};

/// Read-only view of the class hierarchy
pub trait ClassHierarchy {
    fn super_class_of(&self, class: ClassId) -> Option<ClassId>;

    fn is_interface(&self, class: ClassId) -> bool;

    /// Classes whose direct superclass is `class`
    fn direct_subclasses_of(&self, class: ClassId) -> &[ClassId];

    /// Interfaces directly extending `iface`
    fn direct_subinterfaces_of(&self, iface: ClassId) -> &[ClassId];

    /// Classes directly implementing `iface`
    fn direct_implementors_of(&self, iface: ClassId) -> &[ClassId];

    /// Method declared in `class` itself with the given subsignature
    fn declared_method(&self, class: ClassId, subsignature: &Subsignature) -> Option<MethodId>;

    fn is_abstract_method(&self, method: MethodId) -> bool;
}

impl ClassHierarchy for Program {
    fn super_class_of(&self, class: ClassId) -> Option<ClassId> {
        self.class(class).super_class
    }

    fn is_interface(&self, class: ClassId) -> bool {
        self.class(class).is_interface
    }

    fn direct_subclasses_of(&self, class: ClassId) -> &[ClassId] {
        self.subclasses(class)
    }

    fn direct_subinterfaces_of(&self, iface: ClassId) -> &[ClassId] {
        self.subinterfaces(iface)
    }

    fn direct_implementors_of(&self, iface: ClassId) -> &[ClassId] {
        self.implementors(iface)
    }

    fn declared_method(&self, class: ClassId, subsignature: &Subsignature) -> Option<MethodId> {
        self.declared_method_by_subsig(class, subsignature)
    }

    fn is_abstract_method(&self, method: MethodId) -> bool {
        self.method(method).is_abstract
    }
}
