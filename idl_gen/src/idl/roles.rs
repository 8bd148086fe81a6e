use idl_types::{Direction, Interface, Operation};
use serde_derive::Serialize;

/* How an operation is rendered: as declared, or as one side of an attribute */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    None,
    Getter,
    Setter,
}

impl Role {
    pub fn prefix(self) -> &'static str {
        match self {
            Role::None => "",
            Role::Getter => "get_",
            Role::Setter => "set_",
        }
    }

    /* `op`, `get_op` or `set_op` */
    pub fn operation_name(self, op: &Operation) -> String {
        format!("{}{}", self.prefix(), op.name)
    }

    /* Parameter travels caller -> callee in the request */
    pub fn in_request(self, direction: Direction) -> bool {
        match self {
            Role::Setter => true,
            Role::None | Role::Getter => direction.is_in(),
        }
    }

    /* Parameter travels callee -> caller in the response */
    pub fn in_response(self, direction: Direction) -> bool {
        match (self, direction) {
            (_, Direction::In) => false,
            (Role::Setter, Direction::Out) => false,
            _ => true,
        }
    }

    /* Parameter is rendered as `T *name` rather than `T name` */
    pub fn passes_by_pointer(self, direction: Direction, is_base: bool) -> bool {
        match self {
            Role::Setter => !is_base,
            Role::None | Role::Getter => !is_base || direction.is_out(),
        }
    }
}

/* At least one OUT or INOUT parameter */
pub fn has_getter(op: &Operation) -> bool {
    op.parameters.iter().any(|param| param.direction.is_out())
}

/* At least one INOUT parameter, or no OUT parameter at all */
pub fn has_setter(op: &Operation) -> bool {
    let has_inout = op.parameters.iter().any(|param| param.direction == Direction::InOut);
    has_inout || !has_getter(op)
}

/* Roles an operation is generated under, getter before setter */
pub fn roles_for(iface: &Interface, op: &Operation) -> Vec<Role> {
    if !iface.is_attribute_container() {
        return vec![Role::None];
    }
    let mut roles = Vec::with_capacity(2);
    if has_getter(op) {
        roles.push(Role::Getter);
    }
    if has_setter(op) {
        roles.push(Role::Setter);
    }
    roles
}

/* Every (operation, role) pair of an interface in declaration order */
pub fn expand_interface(iface: &Interface) -> Vec<(&Operation, Role)> {
    iface
        .operations
        .iter()
        .flat_map(|op| roles_for(iface, op).into_iter().map(move |role| (op, role)))
        .collect()
}

#[cfg(test)]
mod tests {
    use idl_types::{Parameter, PrimitiveKind, ScopedName, TypeRef};
    use super::*;

    fn op(name: &str, directions: &[Direction]) -> Operation {
        Operation {
            name: name.to_string(),
            returns: TypeRef::void(),
            parameters: directions
                .iter()
                .enumerate()
                .map(|(i, direction)| Parameter {
                    name: format!("p{}", i),
                    param_type: TypeRef::Primitive(PrimitiveKind::Long),
                    direction: *direction,
                })
                .collect(),
            raises: Vec::new(),
        }
    }

    fn attributes(ops: Vec<Operation>) -> Interface {
        Interface {
            name: "Attributes".to_string(),
            scoped_name: ScopedName::parse("Demo::Attributes"),
            operations: ops,
        }
    }

    #[test]
    fn test_role_derivation() {
        use Direction::*;
        let cases: Vec<(Vec<Direction>, bool, bool)> = vec![
            (vec![Out], true, false),
            (vec![In], false, true),
            (vec![InOut], true, true),
            (vec![In, Out], true, false),
            (vec![In, InOut], true, true),
            (vec![], false, true),
        ];
        for (directions, getter, setter) in cases {
            let operation = op("x", &directions);
            assert_eq!(has_getter(&operation), getter, "getter for {:?}", directions);
            assert_eq!(has_setter(&operation), setter, "setter for {:?}", directions);
        }
    }

    #[test]
    fn test_expand_attributes() {
        let iface = attributes(vec![
            op("position", &[Direction::Out]),
            op("gain", &[Direction::InOut]),
            op("reset", &[]),
        ]);
        let expanded: Vec<(String, Role)> = expand_interface(&iface)
            .into_iter()
            .map(|(op, role)| (role.operation_name(op), role))
            .collect();
        assert_eq!(
            expanded,
            vec![
                ("get_position".to_string(), Role::Getter),
                ("get_gain".to_string(), Role::Getter),
                ("set_gain".to_string(), Role::Setter),
                ("set_reset".to_string(), Role::Setter),
            ]
        );
    }

    #[test]
    fn test_plain_interface_single_role() {
        let iface = Interface {
            name: "Services".to_string(),
            scoped_name: ScopedName::parse("Demo::Services"),
            operations: vec![op("reboot", &[Direction::Out])],
        };
        assert_eq!(roles_for(&iface, &iface.operations[0]), vec![Role::None]);
    }

    #[test]
    fn test_direction_law() {
        assert!(Role::None.in_request(Direction::InOut));
        assert!(!Role::Getter.in_request(Direction::Out));
        assert!(Role::Setter.in_request(Direction::Out));

        assert!(!Role::None.in_response(Direction::In));
        assert!(Role::Getter.in_response(Direction::Out));
        assert!(!Role::Setter.in_response(Direction::Out));
        assert!(Role::Setter.in_response(Direction::InOut));
    }

    #[test]
    fn test_pointer_rendering() {
        assert!(!Role::None.passes_by_pointer(Direction::In, true));
        assert!(Role::None.passes_by_pointer(Direction::In, false));
        assert!(Role::Getter.passes_by_pointer(Direction::Out, true));
        assert!(!Role::Setter.passes_by_pointer(Direction::Out, true));
        assert!(Role::Setter.passes_by_pointer(Direction::InOut, false));
    }
}
