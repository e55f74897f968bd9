/*!

# Quick start

Generate an import template and fill it in with a spreadsheet program:

```bash
rosterdraw template --out roster.csv
```

Import it. The roster replaces any roster imported before:

```bash
rosterdraw import --input roster.csv
```

Mark the persons who are not available:

```bash
rosterdraw edit --name "Li Wei" --status vacation --remark "back on Monday"
```

Draw two fighters and one driver in every department:

```bash
rosterdraw draw --draw Fighter=2 --draw Driver=1
```

```text
[2024-03-02T09:55:59Z INFO  roster_draw] draw: 48 persons, 2 configs, 6 departments
[2024-03-02T09:55:59Z WARN  roster_draw] Not enough available persons for Driver in EHu: requested 1, drew 0
[2024-03-02T09:55:59Z INFO  roster_draw] draw: selected 17 persons, 1 shortages
```

Every new draw replaces the previous results. Cells with fewer persons than
requested are marked with `!` in the printed table. Finally, export the results:

```bash
rosterdraw export --out results.csv
```

For a reproducible draw, pass `--seed 1234`. The summary can be written in JSON
with `--out summary.json` and compared with a previous summary with
`--reference summary.json`.

*/
