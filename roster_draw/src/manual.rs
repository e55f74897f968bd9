/*!

This is the long-form manual for `roster_draw` and `rosterdraw`.

## Input formats

The roster is read from the first row (the header) and the rows below it.
The following formats are supported:
* `excel` Excel workbooks (`.xlsx`, `.xls`)
* `csv` Comma Separated Values

The columns are found by name. The names of the template (in Chinese) and
their english equivalent are both accepted:

| column       | also accepted | required |
|--------------|---------------|----------|
| `部门`       | `department`  | yes      |
| `岗位`       | `position`    | yes      |
| `姓名`       | `name`        | yes      |
| `状态`       | `status`      | no       |
| `备注`       | `remark`      | no       |

Rows with an empty department, position or name are skipped. The status is
one of `normal` (`正常`), `vacation` (`休假`), `sick` (`伤病`). An empty or
unknown status is read as `normal`.

A template can be generated with `rosterdraw template --out template.csv`.

## Draw rules

For every department of the configuration and for every draw entry, the
persons of this department, with this position and with the `normal` status
are shuffled. The first ones are selected, up to the requested count. If not
enough persons are available, everyone available is selected and the cell is
reported as a shortage. Entries with a count of zero or less are ignored.

Departments and positions of the roster that are not in the configured lists
are never drawn nor exported. `rosterdraw` prints a warning when it finds some.

## Configuration

`rosterdraw` works without configuration file. The configuration is a JSON
file:

```text
{
  "departments": ["AnZhen", "NewMaterialPark", "EHu", "GangXia", "YangJian", "DongBeiTang"],
  "roles": ["Commander", "Fighter", "Communicator", "Driver", "SafetyOfficer"],
  "draws": [{ "position": "Fighter", "count": 2 }, { "position": "Driver", "count": 1 }],
  "input": { "provider": "excel", "filePath": "roster.xlsx", "excelWorksheetName": "Sheet1" },
  "stateFile": "rosterdraw_state.json"
}
```

All the fields are optional:
 - `departments`, `roles` (arrays of strings): the rows and the columns of the
   results. The default values are shown above.
 - `draws` (array): the number of persons to draw per position in every
   department. If not provided and not given with `--draw`, one person is drawn
   for every position found in the roster.
 - `input`: the default roster file for `rosterdraw import`. The path is
   relative to the configuration file.
 - `stateFile`: where the roster and the last results are kept.

## Output

`rosterdraw export --out results.csv` writes one row per department and one
column per role. Several names in a cell are separated by `、`. Empty cells
contain `-`.

 */
