use idl_types::{
    Definition, EnumDef, Interface, KindClass, Module, ScopedName, StructDef, TypeRef, TypedefDef,
};
use std::collections::HashMap;
use tracing::debug;

use crate::error::LinkError;
use crate::resolver::LoadedModule;

/// Assigns scoped names to declarations and binds every declared reference.
///
/// Declarations are visited in order, so a name is only visible to the
/// declarations that follow it. A struct is registered before its members
/// are linked, which lets a member refer to its enclosing struct through a
/// sequence.
#[derive(Default)]
pub struct Linker {
    symbols: HashMap<ScopedName, KindClass>,
}

/* Where inline constructed types encountered while linking a type are scoped */
#[derive(Clone, Copy)]
enum InlinePolicy<'a> {
    Allowed(&'a ScopedName),
    Rejected,
}

impl Linker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&mut self, modules: &mut [LoadedModule]) -> Result<(), LinkError> {
        for loaded in modules.iter_mut() {
            self.link_module(&mut loaded.module)?;
        }
        Ok(())
    }

    /// Class of an already linked declaration.
    pub fn class_of(&self, name: &ScopedName) -> Option<KindClass> {
        self.symbols.get(name).copied()
    }

    pub fn link_module(&mut self, module: &mut Module) -> Result<(), LinkError> {
        if module.name.is_empty() {
            return Err(LinkError::EmptyName("<schema>".to_string()));
        }
        let scope = ScopedName::root().child(&module.name);
        debug!("linking module {}", scope);

        for definition in &mut module.definitions {
            match definition {
                Definition::Struct(def) => self.link_struct(def, &scope)?,
                Definition::Enum(def) => self.link_enum(def, &scope)?,
                Definition::Typedef(def) => self.link_typedef(def, &scope)?,
            }
        }
        for iface in &mut module.interfaces {
            self.link_interface(iface, &scope)?;
        }
        Ok(())
    }

    fn declare(&mut self, name: &ScopedName, class: KindClass) -> Result<(), LinkError> {
        if self.symbols.contains_key(name) {
            return Err(LinkError::DuplicateDeclaration(name.to_string()));
        }
        self.symbols.insert(name.clone(), class);
        Ok(())
    }

    fn scoped(scope: &ScopedName, name: &str) -> Result<ScopedName, LinkError> {
        if name.trim().is_empty() {
            return Err(LinkError::EmptyName(scope.to_string()));
        }
        Ok(scope.child(name))
    }

    fn link_struct(&mut self, def: &mut StructDef, scope: &ScopedName) -> Result<(), LinkError> {
        def.scoped_name = Self::scoped(scope, &def.name)?;
        self.declare(&def.scoped_name, KindClass::Struct)?;

        let inner = def.scoped_name.clone();
        for member in &mut def.members {
            let context = inner.child(&member.name);
            let policy = InlinePolicy::Allowed(&inner);
            self.link_type(&mut member.member_type, &inner, policy, &context)?;
        }
        Ok(())
    }

    fn link_enum(&mut self, def: &mut EnumDef, scope: &ScopedName) -> Result<(), LinkError> {
        def.scoped_name = Self::scoped(scope, &def.name)?;
        self.declare(&def.scoped_name, KindClass::Enum)
    }

    fn link_typedef(&mut self, def: &mut TypedefDef, scope: &ScopedName) -> Result<(), LinkError> {
        def.scoped_name = Self::scoped(scope, &def.name)?;
        let context = def.scoped_name.clone();
        let class = self.link_type(&mut def.alias, scope, InlinePolicy::Allowed(scope), &context)?;
        let class = if def.dims.is_empty() { class } else { KindClass::Array };
        self.declare(&def.scoped_name, class)
    }

    fn link_interface(
        &mut self,
        iface: &mut Interface,
        scope: &ScopedName,
    ) -> Result<(), LinkError> {
        iface.scoped_name = Self::scoped(scope, &iface.name)?;
        let inner = iface.scoped_name.clone();
        for op in &mut iface.operations {
            let op_scope = inner.child(&op.name);
            self.link_type(&mut op.returns, &inner, InlinePolicy::Rejected, &op_scope)?;
            for param in &mut op.parameters {
                let context = op_scope.child(&param.name);
                self.link_type(&mut param.param_type, &inner, InlinePolicy::Rejected, &context)?;
            }
        }
        Ok(())
    }

    /* Link one type node and return its class */
    fn link_type(
        &mut self,
        ty: &mut TypeRef,
        lookup_scope: &ScopedName,
        inline: InlinePolicy<'_>,
        context: &ScopedName,
    ) -> Result<KindClass, LinkError> {
        match ty {
            TypeRef::Primitive(_) => Ok(KindClass::Scalar),
            TypeRef::StringAlias => Ok(KindClass::String),
            TypeRef::Declared(reference) => {
                let (target, class) = self.lookup(&reference.name, lookup_scope).ok_or_else(|| {
                    LinkError::UnknownType {
                        name: reference.name.clone(),
                        context: context.to_string(),
                    }
                })?;
                reference.target = Some(target);
                reference.class = Some(class);
                Ok(class)
            }
            TypeRef::Sequence(element) => {
                self.link_type(element, lookup_scope, inline, context)?;
                Ok(KindClass::Sequence)
            }
            TypeRef::Struct(def) => match inline {
                InlinePolicy::Allowed(scope) => {
                    self.link_struct(def, scope)?;
                    Ok(KindClass::Struct)
                }
                InlinePolicy::Rejected => Err(LinkError::InlineNotAllowed {
                    name: def.name.clone(),
                    context: context.to_string(),
                }),
            },
            TypeRef::Enum(def) => match inline {
                InlinePolicy::Allowed(scope) => {
                    self.link_enum(def, scope)?;
                    Ok(KindClass::Enum)
                }
                InlinePolicy::Rejected => Err(LinkError::InlineNotAllowed {
                    name: def.name.clone(),
                    context: context.to_string(),
                }),
            },
        }
    }

    /* Innermost scope first; a leading `::` makes the name absolute */
    fn lookup(&self, name: &str, scope: &ScopedName) -> Option<(ScopedName, KindClass)> {
        let path = ScopedName::parse(name);
        if path.is_empty() {
            return None;
        }
        if name.trim_start().starts_with("::") {
            return self.class_of(&path).map(|class| (path, class));
        }

        let mut current = Some(scope.clone());
        while let Some(candidate_scope) = current {
            let candidate = candidate_scope.join(&path);
            if let Some(class) = self.class_of(&candidate) {
                return Some((candidate, class));
            }
            current = candidate_scope.parent();
        }
        None
    }
}
