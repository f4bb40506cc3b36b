use std::io::Cursor;

use chrono::NaiveDate;
use roster_engine::roster::{export_registry, StaffCsvImporter};
use roster_engine::scoring::ProfileSelection;
use roster_engine::{
    RosterEvaluator, RuleSet, RuleSetConfig, ScheduleDraft, ScoringCategorySchema, ShiftCode,
    StaffId, TermKey, ViolationKind,
};

const STAFF_CSV: &str = "\
employeeId,name,level,eligibleShifts,group,maxConsecutiveDays,isPackage,packageType,email,contactId,status
N001,Alice Chen,N3,\"day,evening,night,DL\",ward-a,5,yes,night,alice@example.org,C-1,active
N002,Ben Lin,N2,\"day,evening\",ward-a,6,no,,,,active
N003,Cara Wu,N1,\"day,FF\",ward-a,5,n,,,,active
N004,Dan Ho,N1,day,ward-a,0,no,,,,active
";

const RULES: &str = r#"{
    "monthlyOffDays": 9,
    "dailyPreScheduleLimit": "dynamic",
    "holidayPreScheduleLimit": 1,
    "monthlyPreScheduleLimit": 2,
    "averageOffDays": 9,
    "packageMinDays": 10,
    "enablePackageRule": true,
    "enableShiftOrder": true,
    "shiftOrder": ["FF", "night", "day", "evening", "DL"],
    "enableFFNoNight": true,
    "holidayLimitFormula": "same_as_daily",
    "offCountToLimit": true,
    "otherShiftCountToLimit": false,
    "swapCountToStats": false,
    "swapOpenDays": 3,
    "laborStandardType": "four_week",
    "enableLaborCheck": true
}"#;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).expect("valid date")
}

fn pattern(worked: ShiftCode, offset: usize) -> Vec<ShiftCode> {
    (0..30)
        .map(|day| {
            if (day + offset) % 7 < 5 {
                worked
            } else {
                ShiftCode::Off
            }
        })
        .collect()
}

#[test]
fn csv_staff_json_rules_and_draft_evaluate_end_to_end() {
    let build = StaffCsvImporter::from_reader(Cursor::new(STAFF_CSV)).expect("csv parses");
    assert_eq!(build.rejected.len(), 1);
    assert_eq!(build.rejected[0].employee_id, "N004");
    let registry = build.into_registry();
    assert_eq!(registry.len(), 3);

    let rules = RuleSet::build(RuleSetConfig::from_json_str(RULES).expect("rules parse"))
        .expect("rules valid");
    let profile = serde_json::from_str::<ProfileSelection>("\"B\"")
        .expect("selection parses")
        .resolve(&ScoringCategorySchema::standard())
        .expect("preset resolves");
    let evaluator = RosterEvaluator::new(rules, profile);

    let alice = StaffId::new("N001");
    let ben = StaffId::new("N002");
    let cara = StaffId::new("N003");

    let mut draft = ScheduleDraft::new(2025, 9);
    draft
        .assign_row(&alice, pattern(ShiftCode::Night, 0))
        .assign_row(&ben, pattern(ShiftCode::Evening, 1))
        .assign_row(&cara, pattern(ShiftCode::Day, 2))
        .require(date(1), ShiftCode::Night, 1)
        .require(date(1), ShiftCode::Evening, 1)
        .request(&ben, date(6), ShiftCode::Off);

    let evaluation = evaluator
        .evaluate_draft(&draft, &registry)
        .expect("evaluates");

    assert!(evaluation.feasible, "{:?}", evaluation.violations);
    assert_eq!(evaluation.score.profile, "B");
    assert_eq!(evaluation.score.metric(TermKey::Coverage), 1.0);
    assert_eq!(evaluation.score.metric(TermKey::Pref), 1.0);

    draft
        .assign(&cara, 1, ShiftCode::Night)
        .expect("day in month");
    let evaluation = evaluator
        .evaluate_draft(&draft, &registry)
        .expect("evaluates");
    let kinds = evaluation.violations.count_by_kind();
    assert_eq!(kinds.get(&ViolationKind::IneligibleShift), Some(&1));
    assert!(!evaluation.feasible);

    let exported = export_registry(&registry).expect("exports");
    let reimported = StaffCsvImporter::from_reader(Cursor::new(exported)).expect("reimports");
    assert!(reimported.is_clean());
    assert_eq!(reimported.registry.len(), 3);
}

#[test]
fn evaluation_serializes_for_api_consumers() {
    let registry = StaffCsvImporter::from_reader(Cursor::new(STAFF_CSV))
        .expect("csv parses")
        .into_registry();
    let rules = RuleSet::build(RuleSetConfig::from_json_str(RULES).expect("rules parse"))
        .expect("rules valid");
    let evaluator = RosterEvaluator::new(rules, roster_engine::ProfilePreset::A.profile());

    let mut draft = ScheduleDraft::new(2025, 9);
    draft
        .assign_row(&StaffId::new("N001"), pattern(ShiftCode::Night, 0))
        .assign_row(&StaffId::new("N002"), vec![ShiftCode::Evening; 30])
        .assign_row(&StaffId::new("N003"), pattern(ShiftCode::Day, 2));

    let evaluation = evaluator
        .evaluate_draft(&draft, &registry)
        .expect("evaluates");
    let json = serde_json::to_value(&evaluation).expect("serializes");

    assert_eq!(json["feasible"], false);
    let violations = json["violations"].as_array().expect("array");
    assert!(violations
        .iter()
        .any(|violation| violation["kind"] == "LABOR_LIMIT_EXCEEDED"));
    assert!(!violations
        .iter()
        .any(|violation| violation["kind"] == "OFF_QUOTA_EXCEEDED"));
    assert_eq!(json["score"]["profile"], "A");
}
