use super::*;

#[test]
fn test_widening_is_reflexive() {
    for ty in [CType::int(), CType::char_(), CType::float(), CType::void()] {
        assert!(ty.widens_to(&ty), "{} should widen to itself", ty);
    }
}

#[test]
fn test_widening_chain() {
    assert!(CType::char_().widens_to(&CType::int()));
    assert!(CType::char_().widens_to(&CType::float()));
    assert!(CType::int().widens_to(&CType::float()));
}

#[test]
fn test_widening_is_not_symmetric() {
    assert!(!CType::int().widens_to(&CType::char_()));
    assert!(!CType::float().widens_to(&CType::int()));
    assert!(!CType::float().widens_to(&CType::char_()));
}

#[test]
fn test_widening_is_transitive() {
    let chain = [CType::char_(), CType::int(), CType::float()];
    for a in &chain {
        for b in &chain {
            for c in &chain {
                if a.widens_to(b) && b.widens_to(c) {
                    assert!(a.widens_to(c), "{} -> {} -> {}", a, b, c);
                }
            }
        }
    }
}

#[test]
fn test_struct_equality_is_nominal() {
    let a = CType::struct_("Point", vec![StructMember { name: "x".into(), ty: CType::int() }]);
    let b = CType::struct_("Point", vec![]);
    let c = CType::struct_("Vec2", vec![]);
    assert!(a.same_type(&b), "same name, different members: still equal");
    assert!(b.same_type(&a));
    assert!(!a.same_type(&c));
}

#[test]
fn test_array_compare_ignores_element_const_and_size() {
    let plain = CType::array(CType::char_(), 10);
    let constant = CType::array(CType::char_().as_const(), 0);
    assert!(plain.same_type(&constant));
    assert!(!plain.same_type(&CType::array(CType::int(), 10)));
    assert!(!plain.widens_to(&CType::int()));
}

#[test]
fn test_error_type_matches_everything() {
    assert!(CType::error().same_type(&CType::float()));
    assert!(CType::array(CType::int(), 3).widens_to(&CType::error()));
}

#[test]
fn test_descriptors() {
    assert_eq!(CType::int().descriptor(), "I");
    assert_eq!(CType::char_().descriptor(), "C");
    assert_eq!(CType::float().descriptor(), "F");
    assert_eq!(CType::void().descriptor(), "V");
    assert_eq!(CType::array(CType::char_(), 4).descriptor(), "[C");
    assert_eq!(CType::struct_("S", vec![]).descriptor(), "Ljava/lang/Object;");
    assert_eq!(
        CType::function(CType::void(), vec![CType::int(), CType::float()]).method_descriptor(),
        "(IF)V"
    );
}

#[test]
fn test_member_lookup() {
    let point = CType::struct_(
        "Point",
        vec![
            StructMember { name: "x".into(), ty: CType::int() },
            StructMember { name: "y".into(), ty: CType::float() },
        ],
    );
    assert_eq!(point.member("y").map(|m| m.ty.clone()), Some(CType::float()));
    assert!(point.member("z").is_none());
    assert!(CType::int().member("x").is_none());
}
